// Copyright 2025 Irreducible Inc.

//! Circuit statistics module for analyzing constraint counts and circuit complexity.

use std::{
	collections::{BTreeMap, HashSet},
	fmt,
};

use qesa_core::ConstraintSystem;
use serde::Serialize;

use crate::compiler::circuit::Compiled;

/// Various stats of a compiled circuit that affect the prover performance.
#[derive(Clone, Debug, Serialize)]
pub struct CircuitStat {
	/// Number of gates in the canonical circuit.
	pub n_gates: usize,
	/// Number of gates per kind.
	pub gate_counts: BTreeMap<&'static str, usize>,
	/// Number of constraints.
	pub n_constraints: usize,
	/// Number of row pairs over all constraints.
	pub n_rows: usize,
	/// Number of non-zero coefficients over all rows.
	///
	/// Directly proportional to the size of the constraint file.
	pub n_nonzero: usize,
	/// Number of distinct value indices referenced by the constraints, the constant slot
	/// included.
	pub distinct_value_indices: usize,
	/// Length of the witness vector.
	pub num_variables: usize,
	/// Number of primary inputs, the constant-one input included.
	pub n_inputs: usize,
	/// Number of declared outputs.
	pub n_outputs: usize,
}

impl CircuitStat {
	/// Creates a new `CircuitStat` instance by collecting statistics from the given circuit.
	pub fn collect(compiled: &Compiled) -> Self {
		let circuit = compiled.circuit();
		let cs = compiled.constraint_system();
		let (n_nonzero, distinct_value_indices) = traverse_constraint_system(cs);
		Self {
			n_gates: circuit.n_gates(),
			gate_counts: circuit.gate_counts(),
			n_constraints: cs.n_constraints(),
			n_rows: cs.n_rows(),
			n_nonzero,
			distinct_value_indices,
			num_variables: cs.num_variables,
			n_inputs: circuit.inputs.len(),
			n_outputs: circuit.outputs.len(),
		}
	}
}

impl fmt::Display for CircuitStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Helper to format numbers with commas
		fn fmt_num(n: usize) -> String {
			let s = n.to_string();
			let mut result = String::new();
			for (i, c) in s.chars().rev().enumerate() {
				if i > 0 && i % 3 == 0 {
					result.push(',');
				}
				result.push(c);
			}
			result.chars().rev().collect()
		}

		writeln!(f, "Gates")?;
		writeln!(f, "├─ Number of gates: {}", fmt_num(self.n_gates))?;
		let n_kinds = self.gate_counts.len();
		for (i, (kind, count)) in self.gate_counts.iter().enumerate() {
			let branch = if i + 1 == n_kinds { "└─" } else { "├─" };
			writeln!(f, "│  {branch} {kind}: {}", fmt_num(*count))?;
		}
		writeln!(f, "└─ Outputs: {}", fmt_num(self.n_outputs))?;
		writeln!(f)?;

		writeln!(f, "Constraints")?;
		writeln!(f, "├─ Constraints: {}", fmt_num(self.n_constraints))?;
		writeln!(f, "├─ Row pairs: {}", fmt_num(self.n_rows))?;
		let per_row = if self.n_rows > 0 {
			self.n_nonzero as f64 / self.n_rows as f64
		} else {
			0.0
		};
		writeln!(
			f,
			"├─ Non-zero coefficients: {} ({:.1} per row pair)",
			fmt_num(self.n_nonzero),
			per_row
		)?;
		writeln!(f, "└─ Distinct value indices: {}", fmt_num(self.distinct_value_indices))?;
		writeln!(f)?;

		writeln!(f, "Witness")?;
		writeln!(f, "├─ Length: {}", fmt_num(self.num_variables))?;
		writeln!(f, "├─ Primary inputs: {}", fmt_num(self.n_inputs))?;
		writeln!(
			f,
			"└─ Internal: {}",
			fmt_num(self.num_variables.saturating_sub(self.n_inputs))
		)?;
		writeln!(f)?;

		Ok(())
	}
}

/// Traverses the constraint system and returns the number of non-zero coefficients and the
/// number of distinct value indices, respectively.
fn traverse_constraint_system(cs: &ConstraintSystem) -> (usize, usize) {
	let mut n_nonzero = 0;
	let mut indices = HashSet::new();
	for row in cs.constraints.iter().flat_map(|constraint| &constraint.rows) {
		for side in [&row.a, &row.b] {
			n_nonzero += side.len();
			indices.extend(side.iter().map(|(index, _)| index));
		}
	}
	(n_nonzero, indices.len())
}
