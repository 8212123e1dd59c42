// Copyright 2025 Irreducible Inc.

/// Errors raised while parsing scalar literals.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("empty scalar literal")]
	EmptyLiteral,
	#[error("invalid base-{radix} scalar literal {literal:?}")]
	InvalidLiteral { literal: String, radix: u32 },
}
