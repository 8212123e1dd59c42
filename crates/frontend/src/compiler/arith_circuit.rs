// Copyright 2025 Irreducible Inc.
//! The arithmetic circuit graph every pipeline pass operates on.

use std::{
	collections::{BTreeMap, BTreeSet, HashMap, HashSet},
	fmt, mem,
};

use cranelift_entity::{EntityRef, EntitySet, PrimaryMap, entity_impl};
use itertools::Itertools;
use smallvec::SmallVec;

use crate::{
	compiler::gate::opcode::{Opcode, OpcodeShape},
	error::Error,
};

/// A wire through which a value flows in and out of gates.
///
/// Wires are identified by the integers of the circuit text format. Unlike gates they are not
/// allocated from an arena: passes renumber them freely.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Wire(u32);
entity_impl!(Wire);

impl Wire {
	/// The wire carrying the constant `1` once the primary inputs are normalized.
	pub const ONE: Wire = Wire(0);

	/// The wire with the given id, or `None` for `u32::MAX`, which entity references reserve.
	pub fn try_from_u32(id: u32) -> Option<Wire> {
		(id < u32::MAX).then_some(Wire(id))
	}
}

impl fmt::Display for Wire {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Input or output wires of a gate. Almost every gate has at most two of each.
pub type Wires = SmallVec<[Wire; 2]>;

/// Gate ID - identifies a gate in the circuit.
///
/// Handles are only stable until the next call to [`ArithCircuit::remove_gates`] or
/// [`ArithCircuit::reorder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gate(u32);
entity_impl!(Gate);

/// Describes a particular gate: its kind, input and output wires and a free-text annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateData {
	/// The code of operation of this gate.
	pub opcode: Opcode,
	/// The wires consumed by this gate, in operand order.
	pub inputs: Wires,
	/// The wires produced by this gate.
	pub outputs: Wires,
	/// Carried through to the text format. Quadratic gates render their formula instead.
	pub annotation: String,
}

impl GateData {
	/// Creates a gate without annotation.
	pub fn new(
		opcode: Opcode,
		inputs: impl IntoIterator<Item = Wire>,
		outputs: impl IntoIterator<Item = Wire>,
	) -> Self {
		Self {
			opcode,
			inputs: inputs.into_iter().collect(),
			outputs: outputs.into_iter().collect(),
			annotation: String::new(),
		}
	}

	#[allow(missing_docs)]
	pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
		self.annotation = annotation.into();
		self
	}

	/// The shape the gate's opcode requires.
	pub fn shape(&self) -> OpcodeShape {
		self.opcode.shape()
	}

	/// Ensures the gate has the right shape.
	pub fn validate_shape(&self) -> Result<(), Error> {
		let shape = self.shape();
		if !shape.n_in.admits(self.inputs.len()) || !shape.n_out.admits(self.outputs.len()) {
			return Err(Error::malformed(format!(
				"gate `{}` expects {} inputs and {} outputs",
				self.description(),
				shape.n_in,
				shape.n_out,
			)));
		}
		Ok(())
	}

	/// Short human readable form used in diagnostics, e.g. `add in <1 2> out <3>`.
	pub fn description(&self) -> String {
		format!(
			"{} in <{}> out <{}>",
			self.opcode,
			self.inputs.iter().join(" "),
			self.outputs.iter().join(" "),
		)
	}
}

/// A primary input wire together with its annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryInput {
	#[allow(missing_docs)]
	pub wire: Wire,
	#[allow(missing_docs)]
	pub annotation: String,
}

/// An arithmetic circuit: primary inputs, declared outputs and the gate arena.
///
/// The gate order is significant. After the topological sort it is the evaluation order.
#[derive(Clone, Debug, Default)]
pub struct ArithCircuit {
	#[allow(missing_docs)]
	pub inputs: Vec<PrimaryInput>,
	#[allow(missing_docs)]
	pub outputs: Vec<Wire>,
	#[allow(missing_docs)]
	pub gates: PrimaryMap<Gate, GateData>,
}

impl ArithCircuit {
	#[allow(missing_docs)]
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a primary input.
	pub fn add_input(&mut self, wire: Wire, annotation: impl Into<String>) {
		self.inputs.push(PrimaryInput {
			wire,
			annotation: annotation.into(),
		});
	}

	/// Declares an output.
	pub fn add_output(&mut self, wire: Wire) {
		self.outputs.push(wire);
	}

	/// Appends a gate at the end of the gate order.
	pub fn add_gate(&mut self, data: GateData) -> Gate {
		self.gates.push(data)
	}

	#[allow(missing_docs)]
	pub fn n_gates(&self) -> usize {
		self.gates.len()
	}

	/// The primary input wires in declaration order.
	pub fn input_wires(&self) -> impl Iterator<Item = Wire> + '_ {
		self.inputs.iter().map(|input| input.wire)
	}

	/// The primary input wires as a set.
	pub fn input_set(&self) -> HashSet<Wire> {
		self.input_wires().collect()
	}

	/// The first primary input, which carries the constant `1` after normalization.
	pub fn one(&self) -> Option<Wire> {
		self.inputs.first().map(|input| input.wire)
	}

	/// Every wire referenced by an input, an output or a gate.
	pub fn wires(&self) -> BTreeSet<Wire> {
		let mut wires: BTreeSet<Wire> = self.input_wires().collect();
		wires.extend(self.outputs.iter().copied());
		for data in self.gates.values() {
			wires.extend(data.inputs.iter().copied());
			wires.extend(data.outputs.iter().copied());
		}
		wires
	}

	/// The largest referenced wire id.
	pub fn max_wire(&self) -> Option<Wire> {
		self.wires().last().copied()
	}

	/// Number of distinct wires among inputs, outputs and gate wires.
	pub fn num_variables(&self) -> usize {
		self.wires().len()
	}

	/// Maps every gate output to the gate producing it.
	pub fn producers(&self) -> HashMap<Wire, Gate> {
		let mut producers = HashMap::new();
		for (gate, data) in self.gates.iter() {
			for &output in &data.outputs {
				producers.insert(output, gate);
			}
		}
		producers
	}

	/// Maps every wire to the gates consuming it, in gate order. A gate consuming the same wire
	/// twice is listed once.
	pub fn consumers(&self) -> HashMap<Wire, Vec<Gate>> {
		let mut consumers: HashMap<Wire, Vec<Gate>> = HashMap::new();
		for (gate, data) in self.gates.iter() {
			for &input in &data.inputs {
				let list = consumers.entry(input).or_default();
				if list.last() != Some(&gate) {
					list.push(gate);
				}
			}
		}
		consumers
	}

	/// Removes the given gates, keeping the relative order of the remaining ones.
	pub fn remove_gates(&mut self, removed: &EntitySet<Gate>) {
		let gates = mem::take(&mut self.gates);
		for (gate, data) in gates {
			if !removed.contains(gate) {
				self.gates.push(data);
			}
		}
	}

	/// Rearranges the gates in the given order. Gates not listed are dropped.
	pub fn reorder(&mut self, order: &[Gate]) {
		let mut slots: Vec<Option<GateData>> = mem::take(&mut self.gates)
			.into_iter()
			.map(|(_, data)| Some(data))
			.collect();
		for gate in order {
			if let Some(data) = slots.get_mut(gate.index()).and_then(Option::take) {
				self.gates.push(data);
			}
		}
	}

	/// Renames every wire reference: primary inputs, declared outputs, gate wires and the
	/// placeholders of quadratic formulas.
	pub fn rename_wires(&mut self, mut rename: impl FnMut(Wire) -> Wire) {
		for input in &mut self.inputs {
			input.wire = rename(input.wire);
		}
		for output in &mut self.outputs {
			*output = rename(*output);
		}
		for data in self.gates.values_mut() {
			for wire in data.inputs.iter_mut().chain(data.outputs.iter_mut()) {
				*wire = rename(*wire);
			}
			if let Opcode::Quadratic(form) = &mut data.opcode {
				*form = form.remap(&mut rename);
			}
		}
	}

	/// Number of gates of each kind, keyed by kind name.
	pub fn gate_counts(&self) -> BTreeMap<&'static str, usize> {
		let mut counts = BTreeMap::new();
		for data in self.gates.values() {
			*counts.entry(data.opcode.name()).or_insert(0) += 1;
		}
		counts
	}

	/// Runs a validation pass ensuring all the invariants hold.
	///
	/// Every gate holds its shape, every quadratic formula only mentions the gate's inputs,
	/// every wire is assigned at most once and every consumed wire is assigned.
	pub fn validate(&self) -> Result<(), Error> {
		let mut assigned = HashSet::new();
		for input in &self.inputs {
			if !assigned.insert(input.wire) {
				return Err(Error::malformed(format!(
					"wire {} is declared as primary input twice",
					input.wire
				)));
			}
		}
		for data in self.gates.values() {
			data.validate_shape()?;
			if let Opcode::Quadratic(form) = &data.opcode
				&& let Some(wire) = form.wires().into_iter().find(|w| !data.inputs.contains(w))
			{
				return Err(Error::malformed(format!(
					"formula of gate `{}` refers to wire {wire} which is not an input",
					data.description()
				)));
			}
			for &output in &data.outputs {
				if !assigned.insert(output) {
					return Err(Error::malformed(format!(
						"wire {output} is assigned more than once (gate `{}`)",
						data.description()
					)));
				}
			}
		}
		for data in self.gates.values() {
			if let Some(wire) = data.inputs.iter().find(|w| !assigned.contains(w)) {
				return Err(Error::malformed(format!(
					"gate `{}` consumes wire {wire} which is never assigned",
					data.description()
				)));
			}
		}
		if let Some(wire) = self.outputs.iter().find(|w| !assigned.contains(w)) {
			return Err(Error::malformed(format!(
				"declared output {wire} is never assigned"
			)));
		}
		Ok(())
	}
}
