// Copyright 2025 Irreducible Inc.
//! Padding-gate insertion.
//!
//! Prepares the circuit for quadratic-gate synthesis:
//!
//! 1. `split` and `zerop` gates need their input to be a committed wire, so a gate computing
//!    `x · 1` is inserted in front of every one not reading a primary input.
//! 2. `pack` gates are expanded into a chain of `const-mul-2` and `add` gates.
//! 3. Declared outputs produced by affine gates are routed through a trailing `x · 1` gate so
//!    that they end up being the output of a quadratic gate.

use std::collections::HashSet;

use cranelift_entity::EntitySet;
use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::{ArithCircuit, GateData, Wire},
		gate::Opcode,
	},
	error::Error,
};

/// The lowest id handed out for wires introduced by padding.
pub const FRESH_WIRE_BASE: u32 = 100_000_000;

/// Allocates wire ids not used by the circuit.
struct FreshWires {
	next: u32,
}

impl FreshWires {
	fn new(circuit: &ArithCircuit) -> Self {
		let above_max = circuit
			.max_wire()
			.map_or(0, |wire| wire.as_u32().saturating_add(1));
		Self {
			next: FRESH_WIRE_BASE.max(above_max),
		}
	}

	fn next(&mut self) -> Result<Wire, Error> {
		let wire = Wire::try_from_u32(self.next)
			.ok_or_else(|| Error::malformed("wire ids exhausted while inserting padding gates"))?;
		self.next = self.next.checked_add(1).unwrap_or(u32::MAX);
		Ok(wire)
	}
}

/// Inserts the padding gates. Returns the number of inserted gates.
pub fn insert_padding_gates(circuit: &mut ArithCircuit) -> Result<usize, Error> {
	let one = circuit
		.one()
		.ok_or_else(|| Error::malformed("circuit has no primary inputs"))?;
	let inputs = circuit.input_set();
	let mut fresh = FreshWires::new(circuit);
	let mut added = Vec::new();

	for data in circuit.gates.values_mut() {
		if !matches!(data.opcode, Opcode::Split | Opcode::Zerop) {
			continue;
		}
		let Some(input) = data.inputs.first_mut() else {
			continue;
		};
		if inputs.contains(&*input) {
			continue;
		}
		let padded = fresh.next()?;
		added.push(
			GateData::new(Opcode::Mul, [*input, one], [padded])
				.with_annotation(format!("QuadGate before {}", data.opcode.name())),
		);
		*input = padded;
	}

	let mut packs = EntitySet::new();
	let mut n_packs = 0;
	for (gate, data) in circuit.gates.iter() {
		if data.opcode != Opcode::Pack {
			continue;
		}
		let Some(&output) = data.outputs.first() else {
			continue;
		};
		packs.insert(gate);
		n_packs += 1;
		expand_pack(&data.inputs, output, &mut fresh, &mut added)?;
	}
	circuit.remove_gates(&packs);

	let mut n_inserted = added.len();
	for data in added.drain(..) {
		circuit.add_gate(data);
	}

	let outputs: HashSet<Wire> = circuit.outputs.iter().copied().collect();
	for data in circuit.gates.values_mut() {
		if !data.opcode.is_linear() {
			continue;
		}
		let Some(output) = data.outputs.first_mut() else {
			continue;
		};
		if !outputs.contains(&*output) {
			continue;
		}
		let padded = fresh.next()?;
		added.push(
			GateData::new(Opcode::Mul, [padded, one], [*output])
				.with_annotation("QuadGate before output"),
		);
		*output = padded;
	}

	n_inserted += added.len();
	for data in added {
		circuit.add_gate(data);
	}
	tracing::debug!(n_inserted, n_packs, "inserted padding gates");
	Ok(n_inserted)
}

/// Emits `z = Σ 2^i·b_i` as `acc = b_{k-1}`, then `acc = b_i + 2·acc` down to `i = 0`.
fn expand_pack(
	bits: &[Wire],
	output: Wire,
	fresh: &mut FreshWires,
	added: &mut Vec<GateData>,
) -> Result<(), Error> {
	let annotation = "QuadGate for pack";
	let Some((&msb, rest)) = bits.split_last() else {
		return Ok(());
	};
	if rest.is_empty() {
		added.push(
			GateData::new(Opcode::ConstMul(Scalar::one()), [msb], [output])
				.with_annotation(annotation),
		);
		return Ok(());
	}

	let mut acc = msb;
	for (i, &bit) in rest.iter().enumerate().rev() {
		let doubled = fresh.next()?;
		added.push(
			GateData::new(Opcode::ConstMul(Scalar::from(2u64)), [acc], [doubled])
				.with_annotation(annotation),
		);
		acc = if i == 0 { output } else { fresh.next()? };
		added.push(GateData::new(Opcode::Add, [bit, doubled], [acc]).with_annotation(annotation));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use cranelift_entity::EntityRef;

	use super::*;
	use crate::compiler::arith_circuit::Gate;

	fn w(id: u32) -> Wire {
		Wire::from_u32(id)
	}

	fn gates(circuit: &ArithCircuit) -> Vec<&GateData> {
		circuit.gates.values().collect()
	}

	#[test]
	fn test_split_padding() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_gate(GateData::new(Opcode::Mul, [w(1), w(1)], [w(2)]));
		circuit.add_gate(GateData::new(Opcode::Split, [w(2)], [w(3), w(4)]));
		circuit.add_gate(GateData::new(Opcode::Zerop, [w(1)], [w(5), w(6)]));

		assert_eq!(insert_padding_gates(&mut circuit).unwrap(), 1);
		let gates = gates(&circuit);
		assert_eq!(gates[1].inputs.as_slice(), &[w(FRESH_WIRE_BASE)]);
		// zerop reads a primary input and is left alone
		assert_eq!(gates[2].inputs.as_slice(), &[w(1)]);
		assert_eq!(gates[3].opcode, Opcode::Mul);
		assert_eq!(gates[3].inputs.as_slice(), &[w(2), w(0)]);
		assert_eq!(gates[3].outputs.as_slice(), &[w(FRESH_WIRE_BASE)]);
		assert_eq!(gates[3].annotation, "QuadGate before split");
		circuit.validate().unwrap();
	}

	#[test]
	fn test_pack_chain() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		for i in 1..=3 {
			circuit.add_input(w(i), "");
		}
		circuit.add_gate(GateData::new(Opcode::Pack, [w(1), w(2), w(3)], [w(4)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(4), w(4)], [w(5)]));
		circuit.add_output(w(5));

		assert_eq!(insert_padding_gates(&mut circuit).unwrap(), 4);
		let gates = gates(&circuit);
		let tags = gates.iter().map(|g| g.opcode.to_string()).collect::<Vec<_>>();
		assert_eq!(tags, ["mul", "const-mul-2", "add", "const-mul-2", "add"]);
		let base = FRESH_WIRE_BASE;
		assert_eq!(gates[1].inputs.as_slice(), &[w(3)]);
		assert_eq!(gates[2].inputs.as_slice(), &[w(2), w(base)]);
		assert_eq!(gates[3].inputs.as_slice(), &[w(base + 1)]);
		assert_eq!(gates[4].inputs.as_slice(), &[w(1), w(base + 2)]);
		assert_eq!(gates[4].outputs.as_slice(), &[w(4)]);
		circuit.validate().unwrap();
	}

	#[test]
	fn test_one_bit_pack() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_gate(GateData::new(Opcode::Pack, [w(1)], [w(2)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(2), w(2)], [w(3)]));

		insert_padding_gates(&mut circuit).unwrap();
		let gate = &circuit.gates[Gate::new(1)];
		assert_eq!(gate.opcode, Opcode::ConstMul(Scalar::one()));
		assert_eq!(gate.outputs.as_slice(), &[w(2)]);
	}

	#[test]
	fn test_output_padding() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_gate(GateData::new(Opcode::Sub, [w(1), w(0)], [w(2)]));
		circuit.add_output(w(2));

		assert_eq!(insert_padding_gates(&mut circuit).unwrap(), 1);
		let gates = gates(&circuit);
		assert_eq!(gates[0].outputs.as_slice(), &[w(FRESH_WIRE_BASE)]);
		assert_eq!(gates[1].opcode, Opcode::Mul);
		assert_eq!(gates[1].inputs.as_slice(), &[w(FRESH_WIRE_BASE), w(0)]);
		assert_eq!(gates[1].outputs.as_slice(), &[w(2)]);
		assert_eq!(gates[1].annotation, "QuadGate before output");
	}

	#[test]
	fn test_fresh_wires_above_existing() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(FRESH_WIRE_BASE + 7), "");
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(FRESH_WIRE_BASE + 7)], [w(1)]));
		circuit.add_output(w(1));

		insert_padding_gates(&mut circuit).unwrap();
		assert_eq!(gates(&circuit)[0].outputs.as_slice(), &[w(FRESH_WIRE_BASE + 8)]);
	}

	#[test]
	fn test_fresh_wires_exhausted() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(u32::MAX - 2), "");
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(u32::MAX - 2)], [w(u32::MAX - 1)]));
		circuit.add_output(w(u32::MAX - 1));
		assert!(matches!(
			insert_padding_gates(&mut circuit),
			Err(Error::MalformedCircuit(_))
		));
	}
}
