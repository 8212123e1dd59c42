// Copyright 2025 Irreducible Inc.
//! Quadratic-gate synthesis.
//!
//! Every `mul` becomes a `quadratic` gate whose formula is the product of the affine expansions
//! of its two operands. An operand is expanded by walking backwards through the `add`, `sub` and
//! `const-mul` gates producing it; any other wire is a leaf. Every `xor` becomes a `quadratic`
//! gate with the boolean exclusive-or formula.

use std::collections::{HashMap, HashSet};

use cranelift_entity::EntitySet;

use crate::{
	compiler::{
		arith_circuit::{ArithCircuit, Gate, Wire},
		formula::{Affine, QuadForm},
		gate::{self, Opcode},
	},
	error::Error,
};

/// Expands wires into affine combinations of leaf wires, memoizing per producing gate.
struct Expander<'a> {
	circuit: &'a ArithCircuit,
	/// The affine gate producing each wire.
	producers: HashMap<Wire, Gate>,
	memo: HashMap<Gate, Affine>,
	/// Every affine gate that took part in an expansion.
	visited: EntitySet<Gate>,
}

impl<'a> Expander<'a> {
	fn new(circuit: &'a ArithCircuit) -> Self {
		let producers = circuit
			.producers()
			.into_iter()
			.filter(|(_, gate)| circuit.gates[*gate].opcode.is_linear())
			.collect();
		Self {
			circuit,
			producers,
			memo: HashMap::new(),
			visited: EntitySet::new(),
		}
	}

	fn expand(&mut self, wire: Wire) -> Result<Affine, Error> {
		let Some(&root) = self.producers.get(&wire) else {
			return Ok(Affine::variable(wire));
		};

		// Post-order traversal with an explicit stack. `in_progress` holds the gates whose
		// operands are still being expanded and detects cycles.
		let mut stack = vec![(root, false)];
		let mut in_progress = HashSet::new();
		while let Some((gate, operands_ready)) = stack.pop() {
			if self.memo.contains_key(&gate) {
				continue;
			}
			let data = &self.circuit.gates[gate];
			if !operands_ready {
				in_progress.insert(gate);
				self.visited.insert(gate);
				stack.push((gate, true));
				for input in &data.inputs {
					let Some(&producer) = self.producers.get(input) else {
						continue;
					};
					if self.memo.contains_key(&producer) {
						continue;
					}
					if in_progress.contains(&producer) {
						return Err(Error::malformed(format!(
							"gate `{}` depends on itself",
							data.description()
						)));
					}
					stack.push((producer, false));
				}
				continue;
			}

			let operands = data
				.inputs
				.iter()
				.map(|input| match self.producers.get(input) {
					Some(producer) => self.memo[producer].clone(),
					None => Affine::variable(*input),
				})
				.collect::<Vec<_>>();
			let lc = gate::linear::expand(&data.opcode, &operands).ok_or_else(|| {
				Error::InternalInvariantViolation {
					gate: data.description(),
					reason: "not an affine gate".to_string(),
				}
			})?;
			self.memo.insert(gate, lc);
			in_progress.remove(&gate);
		}
		Ok(self.memo[&root].clone())
	}
}

/// Replaces every `mul` and `xor` gate by a `quadratic` gate and removes the affine gates folded
/// into the formulas.
///
/// An affine gate whose output is still read by a gate other than an affine gate or a `mul` is
/// kept: it becomes a `quadratic` gate computing its expansion times `1`.
///
/// Returns the number of quadratic gates created.
pub fn synthesize_quadratic_gates(circuit: &mut ArithCircuit) -> Result<usize, Error> {
	let xor_gates = circuit
		.gates
		.iter()
		.filter(|(_, data)| data.opcode == Opcode::Xor)
		.map(|(gate, _)| gate)
		.collect::<Vec<_>>();
	for &gate in &xor_gates {
		let data = &mut circuit.gates[gate];
		let [x, y] = data.inputs.as_slice() else {
			unreachable!()
		};
		data.opcode = Opcode::Quadratic(gate::xor::synthesize(*x, *y));
	}

	let mul_gates = circuit
		.gates
		.iter()
		.filter(|(_, data)| data.opcode == Opcode::Mul)
		.map(|(gate, _)| gate)
		.collect::<Vec<_>>();
	let consumers = circuit.consumers();
	let kept = circuit
		.gates
		.iter()
		.filter(|(_, data)| data.opcode.is_linear())
		.filter(|(_, data)| {
			data.outputs
				.iter()
				.flat_map(|wire| consumers.get(wire).into_iter().flatten())
				.any(|&consumer| {
					let opcode = &circuit.gates[consumer].opcode;
					!opcode.is_linear() && *opcode != Opcode::Mul
				})
		})
		.map(|(gate, _)| gate)
		.collect::<Vec<_>>();

	let mut expander = Expander::new(circuit);
	let mut forms = Vec::with_capacity(mul_gates.len() + kept.len());
	for &gate in &mul_gates {
		let [x, y] = circuit.gates[gate].inputs.as_slice() else {
			unreachable!()
		};
		let lhs = expander.expand(*x)?;
		let rhs = expander.expand(*y)?;
		forms.push((gate, gate::mul::synthesize(lhs, rhs)));
	}
	for &gate in &kept {
		let [z] = circuit.gates[gate].outputs.as_slice() else {
			unreachable!()
		};
		forms.push((gate, QuadForm::linear(expander.expand(*z)?)));
	}
	let mut folded = EntitySet::new();
	for gate in expander.visited.iter() {
		if !kept.contains(&gate) {
			folded.insert(gate);
		}
	}

	for (gate, form) in forms {
		let data = &mut circuit.gates[gate];
		data.inputs = form.wires().into_iter().collect();
		data.opcode = Opcode::Quadratic(form);
		data.annotation.clear();
	}
	circuit.remove_gates(&folded);

	Ok(xor_gates.len() + mul_gates.len() + kept.len())
}

#[cfg(test)]
mod tests {
	use qesa_field::Scalar;

	use super::*;
	use crate::compiler::arith_circuit::GateData;

	fn w(id: u32) -> Wire {
		Wire::from_u32(id)
	}

	#[test]
	fn test_folds_affine_chain() {
		// c = (a + 5) * b where 5 = const-mul-5(one)
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "a");
		circuit.add_input(w(2), "b");
		circuit.add_gate(GateData::new(Opcode::ConstMul(Scalar::from(5u64)), [w(0)], [w(3)]));
		circuit.add_gate(GateData::new(Opcode::Add, [w(1), w(3)], [w(4)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(4), w(2)], [w(5)]));
		circuit.add_output(w(5));

		assert_eq!(synthesize_quadratic_gates(&mut circuit).unwrap(), 1);
		assert_eq!(circuit.n_gates(), 1);
		let data = circuit.gates.values().next().unwrap();
		let Opcode::Quadratic(form) = &data.opcode else {
			panic!("expected a quadratic gate")
		};
		assert_eq!(form.to_string(), "(5*_0_ + _1_) * _2_");
		assert_eq!(data.inputs.as_slice(), &[w(0), w(1), w(2)]);
		assert_eq!(data.outputs.as_slice(), &[w(5)]);
	}

	#[test]
	fn test_sub_and_shared_operands() {
		// d = (a - b) * (a - b)
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "a");
		circuit.add_input(w(2), "b");
		circuit.add_gate(GateData::new(Opcode::Sub, [w(1), w(2)], [w(3)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(3), w(3)], [w(4)]));

		synthesize_quadratic_gates(&mut circuit).unwrap();
		let data = circuit.gates.values().next().unwrap();
		let diff = Affine::variable(w(1)) - Affine::variable(w(2));
		assert_eq!(data.opcode, Opcode::Quadratic(QuadForm::product(diff.clone(), diff)));
	}

	#[test]
	fn test_xor() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_input(w(2), "");
		circuit.add_gate(GateData::new(Opcode::Xor, [w(1), w(2)], [w(3)]));

		synthesize_quadratic_gates(&mut circuit).unwrap();
		let data = circuit.gates.values().next().unwrap();
		assert_eq!(data.opcode, Opcode::Quadratic(QuadForm::xor(w(1), w(2))));
		assert_eq!(data.inputs.as_slice(), &[w(1), w(2)]);
	}

	#[test]
	fn test_unused_affine_gates_survive() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(1)], [w(2)]));
		circuit.add_gate(GateData::new(Opcode::Split, [w(1)], [w(3)]));

		assert_eq!(synthesize_quadratic_gates(&mut circuit).unwrap(), 0);
		assert_eq!(circuit.n_gates(), 2);
	}

	#[test]
	fn test_cycle() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(3)], [w(2)]));
		circuit.add_gate(GateData::new(Opcode::Add, [w(0), w(2)], [w(3)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(2), w(0)], [w(4)]));
		assert!(matches!(
			synthesize_quadratic_gates(&mut circuit),
			Err(Error::MalformedCircuit(_))
		));
	}

	#[test]
	fn test_affine_read_by_mul_and_xor() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_input(w(2), "");
		circuit.add_gate(GateData::new(Opcode::Sub, [w(1), w(0)], [w(3)]));
		circuit.add_gate(GateData::new(Opcode::Mul, [w(3), w(2)], [w(4)]));
		circuit.add_gate(GateData::new(Opcode::Xor, [w(3), w(2)], [w(5)]));

		assert_eq!(synthesize_quadratic_gates(&mut circuit).unwrap(), 3);
		let gates = circuit.gates.values().collect::<Vec<_>>();
		let diff = Affine::variable(w(1)) - Affine::variable(w(0));
		assert_eq!(gates[0].opcode, Opcode::Quadratic(QuadForm::linear(diff.clone())));
		assert_eq!(gates[0].inputs.as_slice(), &[w(0), w(1)]);
		assert_eq!(gates[0].outputs.as_slice(), &[w(3)]);
		assert_eq!(
			gates[1].opcode,
			Opcode::Quadratic(QuadForm::product(diff, Affine::variable(w(2))))
		);
		assert_eq!(gates[2].opcode, Opcode::Quadratic(QuadForm::xor(w(3), w(2))));
		circuit.validate().unwrap();
	}

	#[test]
	fn test_affine_chain_read_by_xor_only() {
		let mut circuit = ArithCircuit::new();
		circuit.add_input(w(0), "one-input");
		circuit.add_input(w(1), "");
		circuit.add_input(w(2), "");
		circuit.add_gate(GateData::new(Opcode::ConstMul(Scalar::from(3u64)), [w(1)], [w(3)]));
		circuit.add_gate(GateData::new(Opcode::Sub, [w(3), w(0)], [w(4)]));
		circuit.add_gate(GateData::new(Opcode::Xor, [w(4), w(2)], [w(5)]));

		assert_eq!(synthesize_quadratic_gates(&mut circuit).unwrap(), 2);
		assert_eq!(circuit.n_gates(), 2);
		let gates = circuit.gates.values().collect::<Vec<_>>();
		let lc = Affine::monomial(w(1), Scalar::from(3u64)) - Affine::variable(w(0));
		assert_eq!(gates[0].opcode, Opcode::Quadratic(QuadForm::linear(lc)));
		assert_eq!(gates[0].outputs.as_slice(), &[w(4)]);
		assert!(gates.iter().all(|data| !data.opcode.is_linear()));
		circuit.validate().unwrap();
	}
}
