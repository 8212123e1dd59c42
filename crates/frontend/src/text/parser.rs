// Copyright 2025 Irreducible Inc.
//! Reader of the arithmetic-circuit text format.

use pest::{Parser, iterators::Pair};
use pest_derive::Parser;

use crate::{
	compiler::{
		arith_circuit::{ArithCircuit, GateData, Wire, Wires},
		gate::Opcode,
	},
	error::Error,
};

#[derive(Parser)]
#[grammar = "text/arith.pest"]
struct ArithParser;

/// Parses a circuit from its text form.
///
/// Every line is one of `total <n>`, `input <wire>`, `output <wire>` or
/// `<kind> in <k> <wires> out <m> <wires>`, optionally followed by `# <annotation>`. The angle
/// brackets around wire lists are optional. Blank and comment-only lines are skipped and the
/// `total` line is ignored.
///
/// The circuit is validated before it is returned.
pub fn parse_circuit(text: &str) -> Result<ArithCircuit, Error> {
	let mut circuit = ArithCircuit::new();
	for (index, source) in text.lines().enumerate() {
		parse_line(&mut circuit, source).map_err(|message| Error::Parse {
			line: index + 1,
			message,
		})?;
	}
	circuit.validate()?;
	Ok(circuit)
}

fn parse_line(circuit: &mut ArithCircuit, source: &str) -> Result<(), String> {
	let line = ArithParser::parse(Rule::line, source)
		.map_err(|e| e.variant.message().into_owned())?
		.next()
		.ok_or_else(|| "empty parse".to_string())?;

	let mut statement = None;
	let mut annotation = "";
	for pair in line.into_inner() {
		match pair.as_rule() {
			Rule::comment => {
				annotation = pair
					.into_inner()
					.next()
					.map_or("", |annotation| annotation.as_str().trim());
			}
			Rule::EOI => {}
			_ => statement = Some(pair),
		}
	}
	let Some(statement) = statement else {
		return Ok(());
	};

	match statement.as_rule() {
		Rule::total => {}
		Rule::input => {
			let wire = parse_wire(single(statement)?)?;
			circuit.add_input(wire, annotation);
		}
		Rule::output => {
			let wire = parse_wire(single(statement)?)?;
			circuit.add_output(wire);
		}
		Rule::gate => {
			let mut parts = statement.into_inner();
			let (Some(kind), Some(n_in), Some(inputs), Some(n_out), Some(outputs)) =
				(parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
			else {
				return Err("incomplete gate".to_string());
			};
			let inputs = parse_wire_list(n_in, inputs, "input")?;
			let outputs = parse_wire_list(n_out, outputs, "output")?;
			let opcode = Opcode::parse(kind.as_str(), annotation)?;
			// The formula of a quadratic gate lives in its opcode.
			let annotation = match opcode {
				Opcode::Quadratic(_) => "",
				_ => annotation,
			};
			circuit.add_gate(GateData::new(opcode, inputs, outputs).with_annotation(annotation));
		}
		rule => return Err(format!("unexpected {rule:?}")),
	}
	Ok(())
}

fn single(statement: Pair<'_, Rule>) -> Result<Pair<'_, Rule>, String> {
	statement
		.into_inner()
		.next()
		.ok_or_else(|| "missing wire".to_string())
}

fn parse_wire(number: Pair<'_, Rule>) -> Result<Wire, String> {
	number
		.as_str()
		.parse::<u32>()
		.ok()
		.and_then(Wire::try_from_u32)
		.ok_or_else(|| format!("wire id `{}` is out of range", number.as_str()))
}

fn parse_wire_list(count: Pair<'_, Rule>, list: Pair<'_, Rule>, side: &str) -> Result<Wires, String> {
	let wires = list.into_inner().map(parse_wire).collect::<Result<Wires, _>>()?;
	let expected = count
		.as_str()
		.parse::<usize>()
		.map_err(|_| format!("{side} count `{}` is out of range", count.as_str()))?;
	if wires.len() != expected {
		return Err(format!("expected {expected} {side} wires, found {}", wires.len()));
	}
	Ok(wires)
}
