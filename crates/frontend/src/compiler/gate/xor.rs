// Copyright 2025 Irreducible Inc.
//! Boolean exclusive-or of two 0/1 values.
//!
//! Returns `z = x ⊕ y`.
//!
//! # Algorithm
//!
//! Over the field the exclusive-or of two bits is `x + y - 2xy`, which synthesis writes as the
//! quadratic formula `(1 - x)·y + (1 - y)·x`.

use crate::{
	compiler::{
		arith_circuit::{GateData, Wire},
		eval::WireValues,
		formula::QuadForm,
		gate::opcode::{Arity, OpcodeShape},
	},
	error::Error,
};

pub fn shape() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::Exactly(2),
		n_out: Arity::Exactly(1),
	}
}

/// The formula of the quadratic gate replacing `xor(x, y)`.
pub fn synthesize(x: Wire, y: Wire) -> QuadForm {
	QuadForm::xor(x, y)
}

pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	let [x, y] = data.inputs.as_slice() else {
		unreachable!()
	};
	let [z] = data.outputs.as_slice() else {
		unreachable!()
	};
	let x = values.get(*x)?;
	let y = values.get(*y)?;
	let z_value = x + y - (x * y + x * y);
	values.set(*z, z_value);
	Ok(())
}
