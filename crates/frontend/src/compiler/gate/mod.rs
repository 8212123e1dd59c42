// Copyright 2025 Irreducible Inc.
use crate::{
	compiler::{
		arith_circuit::{ArithCircuit, Gate, GateData},
		constraint_builder::ConstraintBuilder,
		eval::WireValues,
	},
	error::Error,
};

pub mod opcode;

pub use opcode::Opcode;

pub mod linear;
pub mod mul;
pub mod pack;
pub mod quadratic;
pub mod split;
pub mod xor;
pub mod zerop;

/// Emits the constraints of a gate of the canonical circuit.
///
/// Only `quadratic`, `split` and `zerop` gates carry constraints. Any other kind is reported and
/// skipped.
pub fn constrain(gate: Gate, circuit: &ArithCircuit, builder: &mut ConstraintBuilder) {
	let data = &circuit.gates[gate];
	match data.opcode {
		Opcode::Quadratic(_) => quadratic::constrain(gate, data, builder),
		Opcode::Split => split::constrain(gate, data, builder),
		Opcode::Zerop => zerop::constrain(gate, data, builder),
		Opcode::Add
		| Opcode::Sub
		| Opcode::ConstMul(_)
		| Opcode::Mul
		| Opcode::Xor
		| Opcode::Pack => {
			tracing::error!(gate = %data.description(), "unknown gate type, no constraints emitted");
		}
	}
}

/// Computes the outputs of a gate from the values of its inputs.
pub fn evaluate(data: &GateData, values: &mut WireValues) -> Result<(), Error> {
	match data.opcode {
		Opcode::Quadratic(_) => quadratic::evaluate(data, values),
		Opcode::Split => split::evaluate(data, values),
		Opcode::Pack => pack::evaluate(data, values),
		Opcode::Zerop => zerop::evaluate(data, values),
		Opcode::Xor => xor::evaluate(data, values),
		Opcode::Add | Opcode::Sub | Opcode::ConstMul(_) | Opcode::Mul => {
			Err(Error::InternalInvariantViolation {
				gate: data.description(),
				reason: "gate kind cannot be evaluated".to_string(),
			})
		}
	}
}
