// Copyright 2025 Irreducible Inc.
//! Topological sort of the gates into evaluation order.

use std::collections::HashSet;

use crate::{
	compiler::arith_circuit::{ArithCircuit, Gate, Wire},
	error::Error,
};

/// Orders the gates in layers: every layer holds the remaining gates whose inputs are all
/// produced by earlier layers or are primary inputs. Declared outputs are sorted by id.
pub fn sort_gates(circuit: &mut ArithCircuit) -> Result<(), Error> {
	let mut ready: HashSet<Wire> = circuit.input_set();
	let mut todo: Vec<Gate> = circuit.gates.keys().collect();
	let mut order = Vec::with_capacity(todo.len());
	let mut n_layers = 0;
	while !todo.is_empty() {
		let (layer, rest): (Vec<Gate>, Vec<Gate>) = todo.into_iter().partition(|&gate| {
			circuit.gates[gate]
				.inputs
				.iter()
				.all(|wire| ready.contains(wire))
		});
		if layer.is_empty() {
			let stuck = &circuit.gates[rest[0]];
			return Err(Error::malformed(format!(
				"gate `{}` waits for a wire that is never produced",
				stuck.description()
			)));
		}
		for &gate in &layer {
			ready.extend(circuit.gates[gate].outputs.iter().copied());
		}
		order.extend(layer);
		todo = rest;
		n_layers += 1;
	}
	tracing::debug!(n_layers, "sorted gates");

	circuit.reorder(&order);
	circuit.outputs.sort();
	Ok(())
}
