// Copyright 2025 Irreducible Inc.
//! Bit decomposition.
//!
//! Returns the bits `b_0, …, b_{k-1}` of `x`, least significant first.
//!
//! # Constraints
//!
//! The gate generates `k + 1` constraints:
//! - `1 · (Σ 2^i·b_i - x) = 0`
//! - `b_i · (b_i - 1) = 0` for every bit

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
		n_out: Arity::AtLeast(1),
	}
}

pub fn constrain(_gate: Gate, data: &GateData, builder: &mut ConstraintBuilder) {
	let [x] = data.inputs.as_slice() else {
		unreachable!()
	};
	let bits = data.outputs.as_slice();

	// Recomposition
	//
	// 1 · (Σ 2^i·b_i - x) = 0
	let mut sum = WireExpr::term(*x, Scalar::from_i64(-1));
	for (i, bit) in bits.iter().enumerate() {
		sum = sum.plus(*bit, Scalar::power_of_two(i as u64));
	}
	builder
		.constraint()
		.row(WireExpr::constant(Scalar::one()), sum)
		.build();

	// Booleanity
	//
	// b · (b - 1) = 0
	for bit in bits {
		builder
			.constraint()
			.row(*bit, WireExpr::from(*bit).plus_constant(Scalar::from_i64(-1)))
			.build();
	}
}

pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	let [x] = data.inputs.as_slice() else {
		unreachable!()
	};
	let x = values.get(*x)?.clone();
	for (i, bit) in data.outputs.iter().enumerate() {
		values.set(*bit, Scalar::from(x.bit(i as u64)));
	}
	Ok(())
}
