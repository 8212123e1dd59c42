// Copyright 2025 Irreducible Inc.
//! Field multiplication.
//!
//! Returns `z = x · y`.
//!
//! A `mul` gate is replaced during synthesis by a quadratic gate whose single product has the
//! expansions of `x` and `y` as its sides.

use crate::compiler::{
	formula::{Affine, QuadForm},
	gate::opcode::{Arity, OpcodeShape},
};

pub fn shape() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::Exactly(2),
		n_out: Arity::Exactly(1),
	}
}

/// The formula of the quadratic gate replacing a `mul` of the two expansions.
pub fn synthesize(lhs: Affine, rhs: Affine) -> QuadForm {
	QuadForm::product(lhs, rhs)
}
