// Copyright 2025 Irreducible Inc.

//! Arithmetic circuit to quadratic constraint compiler.
//!
//! This crate reads an arithmetic circuit over the prime field of [`qesa_field::ORDER`],
//! rewrites it into a canonical circuit of `quadratic`, `split` and `zerop` gates and emits the
//! quadratic constraint system describing it. It also evaluates the canonical circuit to produce
//! a witness for given primary input values.
//!
//! # Usage Flow
//!
//! Read a circuit with [`parse_circuit`] or assemble an [`ArithCircuit`] directly from
//! [`GateData`]. Wire `0` of every compiled circuit carries the constant `1`; if the first primary
//! input is not annotated `one-input` the last one is moved to the front.
//!
//! [`compile`] runs the whole pipeline and returns a [`Compiled`] artifact holding the canonical
//! circuit and its [`ConstraintSystem`](qesa_core::ConstraintSystem). Call
//! [`Compiled::generate_witness`] with the primary input values, the constant `1` first, to get
//! the [`Witness`](qesa_core::Witness). [`process`] does both in one step.
//!
//! Use [`CircuitStat`] to inspect gate and constraint counts.

#![warn(missing_docs)]

mod compiler;
mod error;
pub mod stat;
mod text;

pub use compiler::{
	Options, Processed, WireOrder,
	arith_circuit::{ArithCircuit, Gate, GateData, PrimaryInput, Wire},
	circuit::Compiled,
	compile, emit_constraints,
	formula::{Affine, Product, QuadForm, parse_formula},
	gate::{
		Opcode,
		opcode::{Arity, OpcodeShape},
	},
	process,
};
pub use error::Error;
pub use stat::CircuitStat;
pub use text::{parse_circuit, write_circuit};

/// Individual pipeline passes, for callers that need intermediate circuits.
pub mod passes {
	pub use crate::compiler::{
		Fixpoint,
		dce::remove_dead_gates,
		eval::evaluate,
		normalize::{ONE_INPUT_MARKER, normalize_inputs},
		padding::{FRESH_WIRE_BASE, insert_padding_gates},
		restructure::restructure_wires,
		synthesis::synthesize_quadratic_gates,
		topo_sort::sort_gates,
		zero_prop::propagate_zeros,
	};
}
