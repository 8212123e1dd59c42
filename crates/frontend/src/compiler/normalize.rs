// Copyright 2025 Irreducible Inc.
//! Input normalization.
//!
//! The constant-one input must come first. Circuits whose first primary input is not annotated
//! `one-input` carry it last; it is moved to the front as wire `0` and every other primary input
//! is shifted up by one.

use std::collections::{HashMap, HashSet};

use crate::{
	compiler::arith_circuit::{ArithCircuit, Wire},
	error::Error,
};

/// The annotation marking the primary input that carries the constant `1`.
pub const ONE_INPUT_MARKER: &str = "one-input";

/// Moves the constant-one input to the front.
///
/// Returns whether the circuit was changed.
pub fn normalize_inputs(circuit: &mut ArithCircuit) -> Result<bool, Error> {
	let Some(first) = circuit.inputs.first() else {
		return Err(Error::malformed("circuit has no primary inputs"));
	};
	if first.annotation.contains(ONE_INPUT_MARKER) {
		return Ok(false);
	}

	let inputs = circuit.input_set();
	let others: HashSet<Wire> = circuit
		.wires()
		.into_iter()
		.filter(|wire| !inputs.contains(wire))
		.collect();

	let last = circuit.inputs[circuit.inputs.len() - 1].wire;
	let mut renames = HashMap::with_capacity(circuit.inputs.len());
	for wire in circuit.input_wires() {
		let renamed = if wire == last {
			Wire::ONE
		} else {
			wire.as_u32()
				.checked_add(1)
				.and_then(Wire::try_from_u32)
				.ok_or_else(|| Error::malformed(format!("input wire {wire} cannot be shifted")))?
		};
		if others.contains(&renamed) {
			return Err(Error::malformed(format!(
				"renumbering input {wire} to {renamed} collides with an internal wire"
			)));
		}
		renames.insert(wire, renamed);
	}

	circuit.rename_wires(|wire| renames.get(&wire).copied().unwrap_or(wire));
	circuit.inputs.rotate_right(1);
	Ok(true)
}
