// Copyright 2025 Irreducible Inc.
//! Quadratic gate, the canonical non-linear primitive.
//!
//! Returns `z = Σ lhs_i · rhs_i` for the products of the gate's formula.
//!
//! # Constraints
//!
//! The gate generates 1 constraint with one row per product and one for the output:
//! - `-1 · z + Σ lhs_i · rhs_i = 0`

use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::{Gate, GateData},
		constraint_builder::{ConstraintBuilder, WireExpr},
		eval::WireValues,
		gate::opcode::{Arity, Opcode, OpcodeShape},
	},
	error::Error,
};

pub fn shape() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::AtLeast(0),
		n_out: Arity::Exactly(1),
	}
}

pub fn constrain(_gate: Gate, data: &GateData, builder: &mut ConstraintBuilder) {
	let Opcode::Quadratic(form) = &data.opcode else {
		unreachable!()
	};
	let [z] = data.outputs.as_slice() else {
		unreachable!()
	};

	let mut constraint = builder
		.constraint()
		.row(WireExpr::constant(Scalar::from_i64(-1)), *z);
	for term in form.terms() {
		constraint = constraint.row(&term.lhs, &term.rhs);
	}
	constraint.build();
}

pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	let Opcode::Quadratic(form) = &data.opcode else {
		unreachable!()
	};
	let [z] = data.outputs.as_slice() else {
		unreachable!()
	};
	let z_value = form.try_evaluate(|wire| values.get(*wire).cloned())?;
	values.set(*z, z_value);
	Ok(())
}
