// Copyright 2025 Irreducible Inc.
//! Scalar arithmetic for the QESA circuit compiler.
//!
//! Every value flowing through a compiled circuit is an element of the prime field of order
//! [`ORDER`]. This crate hosts the [`Scalar`] type implementing that field and the
//! [`LinearCombination`] algebra used to fold chains of linear gates into the operands of a
//! single bilinear constraint.

#![warn(missing_docs)]

pub mod error;
pub mod linear_combination;
pub mod scalar;

pub use error::Error;
pub use linear_combination::LinearCombination;
pub use scalar::{ORDER, Scalar};
