// Copyright 2025 Irreducible Inc.
//! Zero test.
//!
//! Returns `(M, Y)` where `Y = 1` if `x ≠ 0` and `Y = 0` otherwise, and `M = x^{-1}` (zero when
//! `x = 0`).
//!
//! # Constraints
//!
//! The gate generates 2 constraints:
//! - `x · M - Y = 0`
//! - `(1 - Y) · x = 0`

use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::{Gate, GateData},
		constraint_builder::{ConstraintBuilder, WireExpr},
		eval::WireValues,
		gate::opcode::{Arity, OpcodeShape},
	},
	error::Error,
};

pub fn shape() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::Exactly(1),
		n_out: Arity::Exactly(2),
	}
}

pub fn constrain(_gate: Gate, data: &GateData, builder: &mut ConstraintBuilder) {
	let [x] = data.inputs.as_slice() else {
		unreachable!()
	};
	let [m, y] = data.outputs.as_slice() else {
		unreachable!()
	};

	// x · M - 1 · Y = 0
	builder
		.constraint()
		.row(*x, *m)
		.row(WireExpr::constant(Scalar::from_i64(-1)), *y)
		.build();

	// (1 - Y) · x = 0
	builder
		.constraint()
		.row(WireExpr::constant(Scalar::one()).plus(*y, Scalar::from_i64(-1)), *x)
		.build();
}

pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	let [x] = data.inputs.as_slice() else {
		unreachable!()
	};
	let [m, y] = data.outputs.as_slice() else {
		unreachable!()
	};
	let x = values.get(*x)?;
	let (m_value, y_value) = match x.inverse() {
		Some(inverse) => (inverse, Scalar::one()),
		None => (Scalar::ZERO, Scalar::ZERO),
	};
	values.set(*m, m_value);
	values.set(*y, y_value);
	Ok(())
}
