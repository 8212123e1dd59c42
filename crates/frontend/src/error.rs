// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the frontend crate.

use qesa_field::Scalar;

/// Errors raised while reading, compiling or evaluating a circuit.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("malformed circuit: {0}")]
	MalformedCircuit(String),
	#[error("internal invariant violated at gate `{gate}`: {reason}")]
	InternalInvariantViolation { gate: String, reason: String },
	/// Witness generation was given the wrong number of primary-input values.
	#[error("expected {expected} primary input values, got {actual}")]
	InputCountMismatch { expected: usize, actual: usize },
	/// The value supplied for the constant-one input is not `1`. Like
	/// [`Error::InputCountMismatch`] it rejects the supplied inputs before anything is evaluated.
	#[error("the first primary input value must be 1, got {value}")]
	ConstantInputNotOne { value: Scalar },
	#[error("line {line}: {message}")]
	Parse { line: usize, message: String },
	#[error("invalid formula {formula:?}: {message}")]
	Formula { formula: String, message: String },
}

impl Error {
	pub(crate) fn malformed(message: impl Into<String>) -> Self {
		Error::MalformedCircuit(message.into())
	}
}
