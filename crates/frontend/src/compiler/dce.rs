// Copyright 2025 Irreducible Inc.
//! Dead-code elimination.

use std::collections::HashMap;

use cranelift_entity::EntitySet;

use crate::compiler::{
	Fixpoint,
	arith_circuit::{ArithCircuit, Wire},
};

/// Repeatedly removes every gate none of whose outputs is consumed by another gate or declared
/// as a circuit output, until nothing changes.
///
/// Each round sweeps the gates from last to first and drops the uses of a removed gate right
/// away, so a dead chain listed in evaluation order disappears in a single round.
pub fn remove_dead_gates(circuit: &mut ArithCircuit) -> Fixpoint {
	let mut outcome = Fixpoint::default();
	loop {
		outcome.n_rounds += 1;
		let mut uses: HashMap<Wire, usize> = HashMap::new();
		for &wire in &circuit.outputs {
			*uses.entry(wire).or_default() += 1;
		}
		for data in circuit.gates.values() {
			for &wire in &data.inputs {
				*uses.entry(wire).or_default() += 1;
			}
		}

		let mut dead = EntitySet::new();
		let mut n_dead = 0;
		for (gate, data) in circuit.gates.iter().rev() {
			if data.outputs.iter().any(|wire| uses.get(wire).is_some_and(|&n| n > 0)) {
				continue;
			}
			dead.insert(gate);
			n_dead += 1;
			for wire in &data.inputs {
				if let Some(n) = uses.get_mut(wire) {
					*n -= 1;
				}
			}
		}
		if n_dead == 0 {
			break;
		}
		circuit.remove_gates(&dead);
		outcome.n_removed += n_dead;
	}
	outcome
}
