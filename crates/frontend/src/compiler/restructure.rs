// Copyright 2025 Irreducible Inc.
//! Wire restructuring.
//!
//! Assigns fresh sequential wire ids: primary inputs first, then gate outputs in a
//! breadth-first visitation starting from the consumers of the primary inputs, then declared
//! outputs. Afterwards the ids of a circuit are exactly `0..num_variables`.

use std::collections::{HashMap, HashSet, VecDeque};

use cranelift_entity::{EntitySet, SecondaryMap};

use crate::{
	compiler::arith_circuit::{ArithCircuit, Gate, Wire},
	error::Error,
};

/// The visitation order of gates during restructuring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WireOrder {
	/// A gate is visited once all of its input wires have been discovered.
	#[default]
	AllInputsReady,
	/// A gate is visited as soon as any one of its input wires is discovered, and the consumers
	/// of declared outputs are not followed. This reproduces the numbering of earlier releases.
	FirstReadyInput,
}

/// Renumbers every wire of the circuit and returns the old-to-new map.
///
/// Fails with [`Error::MalformedCircuit`] if some gate cannot be reached from the primary inputs.
pub fn restructure_wires(
	circuit: &mut ArithCircuit,
	order: WireOrder,
) -> Result<HashMap<Wire, Wire>, Error> {
	let consumers = circuit.consumers();
	let declared: HashSet<Wire> = circuit.outputs.iter().copied().collect();

	let mut renames: HashMap<Wire, Wire> = HashMap::new();
	let mut next_id = 0u32;
	let mut assign = |renames: &mut HashMap<Wire, Wire>, wire: Wire| {
		renames.entry(wire).or_insert_with(|| {
			let renamed = Wire::from_u32(next_id);
			next_id += 1;
			renamed
		});
	};

	for wire in circuit.input_wires() {
		assign(&mut renames, wire);
	}

	// Gates without inputs are ready from the start.
	let mut queue: VecDeque<Gate> = circuit
		.gates
		.iter()
		.filter(|(_, data)| data.inputs.is_empty())
		.map(|(gate, _)| gate)
		.collect();

	let mut pending: SecondaryMap<Gate, usize> = SecondaryMap::new();
	for (gate, data) in circuit.gates.iter() {
		pending[gate] = data.inputs.iter().collect::<HashSet<_>>().len();
	}
	let mut discover = |wire: Wire, queue: &mut VecDeque<Gate>| {
		for &gate in consumers.get(&wire).into_iter().flatten() {
			match order {
				WireOrder::AllInputsReady => {
					pending[gate] = pending[gate].saturating_sub(1);
					if pending[gate] == 0 {
						queue.push_back(gate);
					}
				}
				WireOrder::FirstReadyInput => queue.push_back(gate),
			}
		}
	};

	for wire in circuit.input_wires() {
		discover(wire, &mut queue);
	}

	let mut visited = EntitySet::new();
	while let Some(gate) = queue.pop_front() {
		if visited.contains(gate) {
			continue;
		}
		visited.insert(gate);
		for &output in &circuit.gates[gate].outputs {
			if declared.contains(&output) {
				if order == WireOrder::AllInputsReady {
					discover(output, &mut queue);
				}
				continue;
			}
			assign(&mut renames, output);
			discover(output, &mut queue);
		}
	}

	if let Some((_, data)) = circuit.gates.iter().find(|(gate, _)| !visited.contains(*gate)) {
		return Err(Error::malformed(format!(
			"gate `{}` is not reachable from the primary inputs",
			data.description()
		)));
	}

	for &output in &circuit.outputs {
		assign(&mut renames, output);
	}

	if let Some(wire) = circuit.wires().into_iter().find(|w| !renames.contains_key(w)) {
		return Err(Error::malformed(format!("wire {wire} is never assigned")));
	}

	circuit.rename_wires(|wire| renames.get(&wire).copied().unwrap_or(wire));
	Ok(renames)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compiler::{arith_circuit::GateData, gate::Opcode};

	fn w(id: u32) -> Wire {
		Wire::from_u32(id)
	}

	// Inputs 0, 1, 2. Gate A consumes 1 and the output of B; B consumes 2.
	fn sample() -> ArithCircuit {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_input(w(2), "");
		circuit.add_gate(GateData::new(Opcode::Mul, [w(1), w(50)], [w(60)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(2), w(2)], [w(50)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(60), w(0)], [w(70)]));
		circuit.add_output(w(70));
		circuit
	}

	#[test]
	fn test_bijection() {
		for order in [WireOrder::AllInputsReady, WireOrder::FirstReadyInput] {
			let mut circuit = sample();
			let before = circuit.wires();
			let renames = restructure_wires(&mut circuit, order).unwrap();

			assert_eq!(renames.len(), before.len());
			let mut images = renames.values().map(|wire| wire.as_u32()).collect::<Vec<_>>();
			images.sort();
			assert_eq!(images, (0..before.len() as u32).collect::<Vec<_>>());
			assert_eq!(circuit.input_wires().collect::<Vec<_>>(), vec![w(0), w(1), w(2)]);
			assert_eq!(circuit.outputs, vec![w(5)]);
			circuit.validate().unwrap();
		}
	}

	#[test]
	fn test_orders_differ() {
		// With the legacy order gate A is visited from input 1 before B is, so its output is
		// numbered first.
		let mut legacy = sample();
		let renames = restructure_wires(&mut legacy, WireOrder::FirstReadyInput).unwrap();
		assert_eq!(renames[&w(60)], w(3));
		assert_eq!(renames[&w(50)], w(4));

		let mut kahn = sample();
		let renames = restructure_wires(&mut kahn, WireOrder::AllInputsReady).unwrap();
		assert_eq!(renames[&w(50)], w(3));
		assert_eq!(renames[&w(60)], w(4));
	}

	#[test]
	fn test_unreachable_gate() {
		let mut circuit = sample();
		circuit.add_gate(GateData::new(Opcode::Mul, [w(80), w(80)], [w(81)]));
		assert!(matches!(
			restructure_wires(&mut circuit, WireOrder::AllInputsReady),
			Err(Error::MalformedCircuit(_))
		));
	}
}
