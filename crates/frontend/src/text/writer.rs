// Copyright 2025 Irreducible Inc.
//! Writer of the arithmetic-circuit text format.

use std::fmt::Write;

use itertools::Itertools;

use crate::compiler::{
	arith_circuit::{ArithCircuit, GateData},
	gate::Opcode,
};

/// The column at which annotations start.
const ANNOTATION_COLUMN: usize = 40;

/// Renders a circuit: the `total` line, then inputs, gates and outputs.
///
/// Quadratic gates carry their formula as the annotation, so the output parses back into the
/// same circuit.
pub fn write_circuit(circuit: &ArithCircuit) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "total {}", circuit.num_variables());
	for input in &circuit.inputs {
		push_annotated(&mut out, &format!("input {}", input.wire), &input.annotation);
	}
	for data in circuit.gates.values() {
		let annotation = match &data.opcode {
			Opcode::Quadratic(form) => form.to_string(),
			_ => data.annotation.clone(),
		};
		push_annotated(&mut out, &gate_line(data), &annotation);
	}
	for output in &circuit.outputs {
		let _ = writeln!(out, "output {output}");
	}
	out
}

/// `<kind> in <k> <wires> out <m> <wires>`
fn gate_line(data: &GateData) -> String {
	format!(
		"{} in {} <{}> out {} <{}>",
		data.opcode,
		data.inputs.len(),
		data.inputs.iter().join(" "),
		data.outputs.len(),
		data.outputs.iter().join(" "),
	)
}

fn push_annotated(out: &mut String, line: &str, annotation: &str) {
	if annotation.is_empty() {
		let _ = writeln!(out, "{line}");
	} else {
		let _ = writeln!(out, "{line:<ANNOTATION_COLUMN$} # {annotation}");
	}
}
