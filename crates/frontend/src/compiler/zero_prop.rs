// Copyright 2025 Irreducible Inc.
//! Zero propagation.
//!
//! A quadratic gate whose formula is identically zero produces the constant `0`. Its output is
//! substituted into every consumer and the gate is removed, until no such gate is left.

use std::collections::HashSet;

use cranelift_entity::EntitySet;

use crate::{
	compiler::{
		Fixpoint,
		arith_circuit::{ArithCircuit, Wire},
		gate::Opcode,
	},
	error::Error,
};

/// Removes quadratic gates computing the constant `0`.
///
/// Gates driving a declared output are kept so that the output stays constrained. Every
/// consumer of a removed gate must be a quadratic gate; its formula gets `0` substituted for the
/// wire and is simplified. Gates are swept in order and a simplified consumer is checked when
/// the sweep reaches it, so a zero chain listed in evaluation order collapses in a single round.
pub fn propagate_zeros(circuit: &mut ArithCircuit) -> Result<Fixpoint, Error> {
	let declared: HashSet<Wire> = circuit.outputs.iter().copied().collect();
	let mut outcome = Fixpoint::default();
	loop {
		outcome.n_rounds += 1;
		let consumers = circuit.consumers();
		let gates = circuit.gates.keys().collect::<Vec<_>>();
		let mut removed = EntitySet::new();
		let mut n_zero = 0;
		for zero_gate in gates {
			let data = &circuit.gates[zero_gate];
			if !matches!(&data.opcode, Opcode::Quadratic(form) if form.is_zero())
				|| data.outputs.iter().any(|wire| declared.contains(wire))
			{
				continue;
			}
			removed.insert(zero_gate);
			n_zero += 1;
			let Some(&wire) = data.outputs.first() else {
				continue;
			};
			for &consumer in consumers.get(&wire).into_iter().flatten() {
				let data = &mut circuit.gates[consumer];
				if !matches!(data.opcode, Opcode::Quadratic(_)) {
					return Err(Error::InternalInvariantViolation {
						gate: data.description(),
						reason: format!("consumes wire {wire} which is constantly zero"),
					});
				}
				if let Opcode::Quadratic(form) = &mut data.opcode {
					form.substitute_zero(wire);
					*form = form.simplify();
					data.inputs = form.wires().into_iter().collect();
				}
			}
		}
		if n_zero == 0 {
			break;
		}
		circuit.remove_gates(&removed);
		outcome.n_removed += n_zero;
	}
	Ok(outcome)
}
