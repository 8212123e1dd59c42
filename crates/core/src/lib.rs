// Copyright 2025 Irreducible Inc.
//! Core datatypes shared by the circuit compiler and its consumers.
//!
//! Most importantly it hosts the definition of a [`ConstraintSystem`], the [`Witness`] that
//! should satisfy it, and the line-oriented text formats both are exchanged in.

#![warn(missing_docs)]

pub mod constraint_system;
pub mod error;
pub mod verify;
pub mod witness;

pub use constraint_system::*;
pub use error::{ConstraintSystemError, ParseError, VerifyError};
pub use qesa_field::{ORDER, Scalar};
pub use witness::Witness;
