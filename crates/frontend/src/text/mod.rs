// Copyright 2025 Irreducible Inc.
//! The line-oriented arithmetic-circuit text format.

mod parser;
mod writer;

pub use parser::parse_circuit;
pub use writer::write_circuit;
