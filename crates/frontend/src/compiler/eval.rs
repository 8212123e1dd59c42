// Copyright 2025 Irreducible Inc.
//! Witness evaluation: replays a circuit over the field.

use std::collections::HashMap;

use cranelift_entity::EntityRef;
use qesa_core::Witness;
use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::{ArithCircuit, Wire},
		gate,
	},
	error::Error,
};

/// The values assigned to wires so far.
#[derive(Default)]
pub struct WireValues {
	values: HashMap<Wire, Scalar>,
}

impl WireValues {
	pub fn new() -> Self {
		Self::default()
	}

	/// The value of `wire`. Reading a wire no gate has assigned yet means the circuit is not in
	/// evaluation order or misses a producer.
	pub fn get(&self, wire: Wire) -> Result<&Scalar, Error> {
		self.values
			.get(&wire)
			.ok_or_else(|| Error::malformed(format!("wire {wire} is read before it is assigned")))
	}

	pub fn set(&mut self, wire: Wire, value: Scalar) {
		self.values.insert(wire, value);
	}

	/// Lays the values out densely by wire id. Slots never assigned are zero.
	pub fn into_witness(self, len: usize) -> Witness {
		let mut values = vec![Scalar::ZERO; len];
		for (wire, value) in self.values {
			if let Some(slot) = values.get_mut(wire.index()) {
				*slot = value;
			}
		}
		Witness::from_values(values)
	}
}

/// Checks the primary input values: one value per primary input, the first being `1`.
pub fn check_inputs(circuit: &ArithCircuit, inputs: &[Scalar]) -> Result<(), Error> {
	if inputs.len() != circuit.inputs.len() {
		return Err(Error::InputCountMismatch {
			expected: circuit.inputs.len(),
			actual: inputs.len(),
		});
	}
	if let Some(first) = inputs.first()
		&& !first.is_one()
	{
		return Err(Error::ConstantInputNotOne {
			value: first.clone(),
		});
	}
	Ok(())
}

/// Evaluates the gates in order and returns the witness, indexed by wire id up to the largest
/// wire of the circuit.
pub fn evaluate(circuit: &ArithCircuit, inputs: &[Scalar]) -> Result<Witness, Error> {
	check_inputs(circuit, inputs)?;

	let mut values = WireValues::new();
	for (wire, value) in circuit.input_wires().zip(inputs) {
		values.set(wire, value.clone());
	}
	for data in circuit.gates.values() {
		gate::evaluate(data, &mut values)?;
	}

	let len = circuit.max_wire().map_or(0, |wire| wire.index() + 1);
	Ok(values.into_witness(len))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compiler::{
		arith_circuit::GateData,
		formula::{Affine, QuadForm},
		gate::Opcode,
	};

	fn w(id: u32) -> Wire {
		Wire::from_u32(id)
	}

	fn zerop_circuit() -> ArithCircuit {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "x");
		circuit.add_gate(GateData::new(Opcode::Zerop, [w(1)], [w(2), w(3)]));
		circuit.add_output(w(3));
		circuit
	}

	fn values(inputs: &[u64]) -> Vec<Scalar> {
		inputs.iter().map(|&v| Scalar::from(v)).collect()
	}

	#[test]
	fn test_zerop() {
		let circuit = zerop_circuit();

		let witness = evaluate(&circuit, &values(&[1, 0])).unwrap();
		assert_eq!(witness.values()[2..], [Scalar::ZERO, Scalar::ZERO]);

		let witness = evaluate(&circuit, &values(&[1, 7])).unwrap();
		let m = &witness.values()[2];
		assert_eq!(m * Scalar::from(7u64), Scalar::one());
		assert_eq!(witness.values()[3], Scalar::one());
	}

	#[test]
	fn test_input_checks() {
		let circuit = zerop_circuit();
		assert_eq!(
			evaluate(&circuit, &values(&[1])).unwrap_err(),
			Error::InputCountMismatch {
				expected: 2,
				actual: 1
			}
		);
		assert!(matches!(
			evaluate(&circuit, &values(&[2, 5])),
			Err(Error::ConstantInputNotOne { .. })
		));
	}

	#[test]
	fn test_split_pack_inverse() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "x");
		let bits = (2..10).map(w).collect::<Vec<_>>();
		circuit.add_gate(GateData::new(Opcode::Split, [w(1)], bits.iter().copied()));
		circuit.add_gate(GateData::new(Opcode::Pack, bits.iter().copied(), [w(10)]));
		circuit.add_output(w(10));

		for x in 0..=255u64 {
			let witness = evaluate(&circuit, &values(&[1, x])).unwrap();
			assert_eq!(witness.values()[10], Scalar::from(x));
			for (i, bit) in witness.values()[2..10].iter().enumerate() {
				assert_eq!(*bit, Scalar::from((x >> i) & 1));
			}
		}
	}

	#[test]
	fn test_xor_and_quadratic() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_input(w(2), "");
		circuit.add_gate(GateData::new(Opcode::Xor, [w(1), w(2)], [w(3)]));
		let form = QuadForm::xor(w(1), w(2));
		circuit.add_gate(GateData::new(Opcode::Quadratic(form), [w(1), w(2)], [w(4)]));
		for (a, b) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
			let witness = evaluate(&circuit, &values(&[1, a, b])).unwrap();
			assert_eq!(witness.values()[3], Scalar::from(a ^ b));
			assert_eq!(witness.values()[4], Scalar::from(a ^ b));
		}
	}

	#[test]
	fn test_unassigned_wire() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		let form = QuadForm::linear(Affine::variable(w(5)));
		circuit.add_gate(GateData::new(Opcode::Quadratic(form), [w(5)], [w(6)]));
		assert!(matches!(
			evaluate(&circuit, &values(&[1])),
			Err(Error::MalformedCircuit(_))
		));
	}

	#[test]
	fn test_linear_gate_is_not_evaluable() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(0)], [w(1)]));
		assert!(matches!(
			evaluate(&circuit, &values(&[1])),
			Err(Error::InternalInvariantViolation { .. })
		));
	}
}
