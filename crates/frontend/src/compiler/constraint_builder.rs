// Copyright 2025 Irreducible Inc.
use qesa_core::constraint_system::{Constraint, ConstraintSystem, RowPair, SparseRow, ValueIndex};
use qesa_field::Scalar;

use crate::compiler::{arith_circuit::Wire, formula::Affine};

/// Builder for creating constraints using Wire references
#[derive(Default)]
pub struct ConstraintBuilder {
	pub constraints: Vec<WireConstraint>,
}

impl ConstraintBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a constraint: Σ Aᵢ · Bᵢ = 0
	pub fn constraint(&mut self) -> WireConstraintBuilder<'_> {
		WireConstraintBuilder::new(self)
	}

	/// Convert all wire-based constraints to ValueIndex-based constraints.
	///
	/// Wire `w` maps onto value index `w`. The constant term of a row lands in the constant slot
	/// and is merged with any occurrence of wire `0`.
	pub fn build(self, num_variables: usize) -> ConstraintSystem {
		let constraints = self
			.constraints
			.into_iter()
			.map(WireConstraint::into_constraint)
			.collect();
		ConstraintSystem::new(num_variables, constraints)
	}
}

/// Constraint using Wire references
pub struct WireConstraint {
	pub rows: Vec<(Affine, Affine)>,
}

impl WireConstraint {
	fn into_constraint(self) -> Constraint {
		Constraint::new(
			self.rows
				.into_iter()
				.map(|(a, b)| RowPair::new(to_sparse_row(&a), to_sparse_row(&b)))
				.collect(),
		)
	}
}

fn to_sparse_row(lc: &Affine) -> SparseRow {
	SparseRow::from_terms(lc.iter().map(|(wire, coeff)| {
		let index = wire.map_or(ValueIndex::CONSTANT, |wire| ValueIndex(wire.as_u32()));
		(index, coeff.clone())
	}))
}

pub struct WireConstraintBuilder<'a> {
	builder: &'a mut ConstraintBuilder,
	rows: Vec<(Affine, Affine)>,
}

impl<'a> WireConstraintBuilder<'a> {
	fn new(builder: &'a mut ConstraintBuilder) -> Self {
		Self {
			builder,
			rows: Vec::new(),
		}
	}

	/// Add the row pair `a · b`
	pub fn row(mut self, a: impl Into<WireExpr>, b: impl Into<WireExpr>) -> Self {
		self.rows.push((a.into().0, b.into().0));
		self
	}

	/// Finalize and add the constraint
	pub fn build(self) {
		self.builder.constraints.push(WireConstraint { rows: self.rows });
	}
}

/// An affine expression in a constraint row.
pub struct WireExpr(pub Affine);

impl WireExpr {
	/// The constant `value`.
	pub fn constant(value: Scalar) -> Self {
		WireExpr(Affine::constant(value))
	}

	/// `coeff · wire`
	pub fn term(wire: Wire, coeff: Scalar) -> Self {
		WireExpr(Affine::monomial(wire, coeff))
	}

	/// Adds `coeff · wire`.
	pub fn plus(mut self, wire: Wire, coeff: Scalar) -> Self {
		self.0.add_term(Some(wire), coeff);
		self
	}

	/// Adds the constant `value`.
	pub fn plus_constant(mut self, value: Scalar) -> Self {
		self.0.add_term(None, value);
		self
	}
}

impl From<Wire> for WireExpr {
	fn from(wire: Wire) -> Self {
		WireExpr(Affine::variable(wire))
	}
}

impl From<Affine> for WireExpr {
	fn from(lc: Affine) -> Self {
		WireExpr(lc)
	}
}

impl From<&Affine> for WireExpr {
	fn from(lc: &Affine) -> Self {
		WireExpr(lc.clone())
	}
}
