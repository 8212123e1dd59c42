// Copyright 2025 Irreducible Inc.
use qesa_core::{ConstraintSystem, Witness};
use qesa_field::Scalar;

use crate::{
	compiler::{arith_circuit::ArithCircuit, eval},
	error::Error,
};

/// An artifact that represents a compiled circuit.
///
/// The difference from [`ConstraintSystem`] is that a compiled circuit retains the canonical
/// gate list, which is needed to evaluate the circuit and generate witness values.
#[derive(Clone, Debug)]
pub struct Compiled {
	circuit: ArithCircuit,
	constraint_system: ConstraintSystem,
}

impl Compiled {
	pub(super) fn new(circuit: ArithCircuit, constraint_system: ConstraintSystem) -> Self {
		Self {
			circuit,
			constraint_system,
		}
	}

	/// Returns the canonical circuit: only `quadratic`, `split` and `zerop` gates in evaluation
	/// order, wires numbered `0..num_variables`.
	pub fn circuit(&self) -> &ArithCircuit {
		&self.circuit
	}

	/// Returns the constraint system for this circuit.
	pub fn constraint_system(&self) -> &ConstraintSystem {
		&self.constraint_system
	}

	/// Returns the number of gates in this circuit.
	///
	/// Split and zerop gates emit more than one constraint, so the number of constraints might be
	/// larger.
	pub fn n_gates(&self) -> usize {
		self.circuit.n_gates()
	}

	/// Evaluates the circuit gate-by-gate for the given primary input values.
	///
	/// # Errors
	///
	/// Fails if the number of values does not match the number of primary inputs or if the
	/// first value is not `1`.
	pub fn generate_witness(&self, inputs: &[Scalar]) -> Result<Witness, Error> {
		eval::evaluate(&self.circuit, inputs)
	}

	/// Splits the artifact into the circuit and its constraint system.
	pub fn into_parts(self) -> (ArithCircuit, ConstraintSystem) {
		(self.circuit, self.constraint_system)
	}
}
