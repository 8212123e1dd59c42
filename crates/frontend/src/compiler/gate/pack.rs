// Copyright 2025 Irreducible Inc.
//! Bit recomposition.
//!
//! Returns `z = Σ 2^i·b_i` for the input bits `b_0, …, b_{k-1}`, least significant first.
//!
//! Padding replaces every `pack` by a chain of `const-mul-2` and `add` gates, so the gate never
//! reaches constraint emission. The evaluator still supports it for circuits evaluated as-is.

use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::GateData,
		eval::WireValues,
		gate::opcode::{Arity, OpcodeShape},
	},
	error::Error,
};

pub fn shape() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::AtLeast(1),
		n_out: Arity::Exactly(1),
	}
}

pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	let [z] = data.outputs.as_slice() else {
		unreachable!()
	};
	let mut acc = Scalar::ZERO;
	for (i, bit) in data.inputs.iter().enumerate() {
		acc += values.get(*bit)? * Scalar::power_of_two(i as u64);
	}
	values.set(*z, acc);
	Ok(())
}
