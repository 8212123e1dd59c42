// Copyright 2025 Irreducible Inc.
//! Affine gates: `add`, `sub` and `const-mul`.
//!
//! Returns `z = x + y`, `z = x - y` and `z = c·x` respectively.
//!
//! These gates never reach constraint emission. Quadratic-gate synthesis folds every chain of
//! them feeding a `mul` into the formula of a single quadratic gate. One still read by another
//! kind of gate becomes a quadratic gate with a linear formula.

use crate::compiler::{
	formula::Affine,
	gate::opcode::{Arity, Opcode, OpcodeShape},
};

pub fn shape_binary() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::Exactly(2),
		n_out: Arity::Exactly(1),
	}
}

pub fn shape_const_mul() -> OpcodeShape {
	OpcodeShape {
		n_in: Arity::Exactly(1),
		n_out: Arity::Exactly(1),
	}
}

/// Combines the expansions of the operands of an affine gate.
///
/// Returns `None` if the opcode is not affine or the operand count does not match.
pub fn expand(opcode: &Opcode, operands: &[Affine]) -> Option<Affine> {
	match (opcode, operands) {
		(Opcode::Add, [x, y]) => Some(x.clone() + y),
		(Opcode::Sub, [x, y]) => Some(x.clone() - y.clone()),
		(Opcode::ConstMul(c), [x]) => Some(x.scale(c)),
		_ => None,
	}
}
