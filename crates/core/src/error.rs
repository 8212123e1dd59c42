// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the core crate.

use qesa_field::Scalar;

/// Constraint system related error.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum ConstraintSystemError {
	#[error(
		"constraint #{constraint_index} row #{row_index} refers to out-of-range value index in its {operand_name} operand (index {value_index} >= num variables {num_variables})"
	)]
	OutOfRangeValueIndex {
		constraint_index: usize,
		row_index: usize,
		operand_name: &'static str,
		value_index: u32,
		num_variables: usize,
	},
	#[error("constraint #{constraint_index} has no rows")]
	EmptyConstraint { constraint_index: usize },
}

/// Errors raised while reading the constraint or witness text formats.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("missing `<num variables>` header line")]
	MissingHeader,
	#[error("line {line}: {message}")]
	Syntax { line: usize, message: String },
	#[error("line {line}: {source}")]
	Scalar {
		line: usize,
		#[source]
		source: qesa_field::Error,
	},
}

/// Reasons a witness fails to satisfy a constraint system.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
	#[error("the witness is too short. Expected at least: {expected}, Actual: {actual}")]
	WitnessTooShort { expected: usize, actual: usize },
	#[error("the constant slot must hold 1, got: {value}")]
	ConstantSlotNotOne { value: Scalar },
	#[error("row refers to value index {value_index} outside the witness of length {len}")]
	IndexOutOfRange { value_index: u32, len: usize },
	#[error("constraint #{constraint_index} (matrix {}) evaluates to {value} instead of 0", .constraint_index + 1)]
	Unsatisfied {
		constraint_index: usize,
		value: Scalar,
	},
}
