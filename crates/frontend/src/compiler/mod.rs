// Copyright 2025 Irreducible Inc.
//! The compilation pipeline.
//!
//! A circuit is moved through the passes in a fixed order:
//!
//! 1. input normalization, so that wire `0` carries the constant `1`,
//! 2. dead-code elimination,
//! 3. padding-gate insertion,
//! 4. wire restructuring,
//! 5. quadratic-gate synthesis,
//! 6. zero propagation,
//! 7. dead-code elimination and a second wire restructuring,
//! 8. topological sort.
//!
//! The resulting canonical circuit consists of `quadratic`, `split` and `zerop` gates only. It is
//! turned into a [`ConstraintSystem`] by emitting the constraints of every gate in order.

use qesa_core::{ConstraintSystem, Witness};
use qesa_field::Scalar;

use crate::{
	compiler::{
		arith_circuit::ArithCircuit, circuit::Compiled, constraint_builder::ConstraintBuilder,
	},
	error::Error,
};

pub mod arith_circuit;
pub mod circuit;
pub mod constraint_builder;
pub mod dce;
pub mod eval;
pub mod formula;
pub mod gate;
pub mod normalize;
pub mod padding;
pub mod restructure;
pub mod synthesis;
#[cfg(test)]
mod tests;
pub mod topo_sort;
pub mod zero_prop;

pub use restructure::WireOrder;

/// What a pass that repeats until nothing changes did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fixpoint {
	/// Number of removed gates.
	pub n_removed: usize,
	/// Number of sweeps over the gates, including the last one which changed nothing.
	pub n_rounds: usize,
}

/// Options for the compiler.
#[derive(Clone, Debug)]
pub struct Options {
	/// Gate visitation order used when renumbering wires.
	pub wire_order: WireOrder,
	/// Whether quadratic gates computing the constant `0` are folded into their consumers.
	pub zero_propagation: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			wire_order: WireOrder::AllInputsReady,
			zero_propagation: true,
		}
	}
}

impl Options {
	/// The default options, adjusted by the environment.
	///
	/// `QESA_LEGACY_WIRE_ORDER` selects [`WireOrder::FirstReadyInput`] and `QESA_NO_ZERO_PROP`
	/// disables zero propagation.
	pub fn from_env() -> Self {
		let mut opts = Self::default();
		if std::env::var("QESA_LEGACY_WIRE_ORDER").is_ok() {
			opts.wire_order = WireOrder::FirstReadyInput;
		}
		if std::env::var("QESA_NO_ZERO_PROP").is_ok() {
			opts.zero_propagation = false;
		}
		opts
	}
}

/// Emits the constraints of every gate of a canonical circuit, in gate order.
///
/// Gates without a constraint encoding are logged and skipped.
pub fn emit_constraints(circuit: &ArithCircuit) -> ConstraintSystem {
	let _scope = tracing::debug_span!("Constraint emission").entered();
	let mut builder = ConstraintBuilder::new();
	for gate in circuit.gates.keys() {
		gate::constrain(gate, circuit, &mut builder);
	}
	let cs = builder.build(circuit.num_variables());
	tracing::info!(
		n_constraints = cs.n_constraints(),
		n_rows = cs.n_rows(),
		num_variables = cs.num_variables,
		"emitted constraints"
	);
	cs
}

/// Compiles a circuit into its canonical form and the constraint system describing it.
///
/// # Errors
///
/// Fails if the circuit is malformed: a consumed wire is never assigned, a gate has the wrong
/// number of wires, gates form a cycle, or the circuit has no primary inputs.
pub fn compile(mut circuit: ArithCircuit, opts: &Options) -> Result<Compiled, Error> {
	let _scope = tracing::debug_span!("Compile").entered();
	circuit.validate()?;

	{
		let _scope = tracing::debug_span!("Input normalization").entered();
		let renamed = normalize::normalize_inputs(&mut circuit)?;
		tracing::debug!(renamed, "normalized primary inputs");
	}
	{
		let _scope = tracing::debug_span!("Dead-code elimination").entered();
		let Fixpoint {
			n_removed,
			n_rounds,
		} = dce::remove_dead_gates(&mut circuit);
		tracing::debug!(n_removed, n_rounds, "removed dead gates");
	}
	{
		let _scope = tracing::debug_span!("Padding").entered();
		padding::insert_padding_gates(&mut circuit)?;
	}
	{
		let _scope = tracing::debug_span!("Wire restructuring").entered();
		restructure::restructure_wires(&mut circuit, opts.wire_order)?;
	}
	{
		let _scope = tracing::debug_span!("Quadratic synthesis").entered();
		let n_synthesized = synthesis::synthesize_quadratic_gates(&mut circuit)?;
		tracing::debug!(n_synthesized, n_gates = circuit.n_gates(), "synthesized quadratic gates");
	}
	if opts.zero_propagation {
		let _scope = tracing::debug_span!("Zero propagation").entered();
		let Fixpoint {
			n_removed,
			n_rounds,
		} = zero_prop::propagate_zeros(&mut circuit)?;
		tracing::debug!(n_removed, n_rounds, "propagated zeros");
	}
	{
		let _scope = tracing::debug_span!("Dead-code elimination").entered();
		let Fixpoint {
			n_removed,
			n_rounds,
		} = dce::remove_dead_gates(&mut circuit);
		tracing::debug!(n_removed, n_rounds, "removed dead gates");
	}
	{
		let _scope = tracing::debug_span!("Wire restructuring").entered();
		restructure::restructure_wires(&mut circuit, opts.wire_order)?;
	}
	{
		let _scope = tracing::debug_span!("Topological sort").entered();
		topo_sort::sort_gates(&mut circuit)?;
	}

	tracing::info!(
		n_gates = circuit.n_gates(),
		num_variables = circuit.num_variables(),
		"compiled circuit"
	);
	let constraint_system = emit_constraints(&circuit);
	Ok(Compiled::new(circuit, constraint_system))
}

/// The result of [`process`].
#[derive(Clone, Debug)]
pub struct Processed {
	/// The canonical circuit.
	pub circuit: ArithCircuit,
	/// The constraints of the canonical circuit.
	pub constraint_system: ConstraintSystem,
	/// The witness for the given primary inputs.
	pub witness: Witness,
}

/// Compiles a circuit and evaluates it on the given primary input values.
pub fn process(circuit: ArithCircuit, inputs: &[Scalar], opts: &Options) -> Result<Processed, Error> {
	let compiled = compile(circuit, opts)?;
	let witness = {
		let _scope = tracing::debug_span!("Witness evaluation").entered();
		compiled.generate_witness(inputs)?
	};
	let (circuit, constraint_system) = compiled.into_parts();
	Ok(Processed {
		circuit,
		constraint_system,
		witness,
	})
}
