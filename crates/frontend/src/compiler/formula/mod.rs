// Copyright 2025 Irreducible Inc.
//! Quadratic forms, the algebraic content of a `quadratic` gate.
//!
//! A form is a sum of products `Σ lhsᵢ · rhsᵢ` where both sides are affine combinations of
//! wires. Purely linear contributions are stored as a product with the constant `1` on the
//! right-hand side.
//!
//! The text rendering uses `_<wire>_` placeholders, e.g. `(_1_ + 5) * _2_ - 3*_4_`, and is
//! read back by [`parse_formula`].

mod parser;

use std::{
	collections::{BTreeMap, BTreeSet, btree_map::Entry},
	fmt,
};

use qesa_field::{LinearCombination, Scalar};

pub use self::parser::parse_formula;
use crate::compiler::arith_circuit::Wire;

/// An affine combination of wires.
pub type Affine = LinearCombination<Wire>;

/// A single product `lhs · rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
	#[allow(missing_docs)]
	pub lhs: Affine,
	#[allow(missing_docs)]
	pub rhs: Affine,
}

impl Product {
	/// Creates the product of two sides.
	pub fn new(lhs: Affine, rhs: Affine) -> Self {
		Self { lhs, rhs }
	}

	/// Whether either side is identically zero.
	pub fn is_zero(&self) -> bool {
		self.lhs.is_zero() || self.rhs.is_zero()
	}

	fn try_evaluate<E>(
		&self,
		mut value: impl FnMut(&Wire) -> Result<Scalar, E>,
	) -> Result<Scalar, E> {
		let lhs = self.lhs.try_evaluate(&mut value)?;
		let rhs = self.rhs.try_evaluate(&mut value)?;
		Ok(lhs * rhs)
	}
}

/// A sum of [`Product`]s. Terms with a zero side are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadForm {
	terms: Vec<Product>,
}

impl QuadForm {
	/// The empty sum.
	pub fn zero() -> Self {
		Self::default()
	}

	/// A form consisting of the single product `lhs · rhs`.
	pub fn product(lhs: Affine, rhs: Affine) -> Self {
		let mut form = Self::zero();
		form.push(Product::new(lhs, rhs));
		form
	}

	/// A purely linear form.
	pub fn linear(lc: Affine) -> Self {
		Self::product(lc, Affine::constant(Scalar::one()))
	}

	/// Boolean exclusive-or of two 0/1 wires: `(1 - a)·b + (1 - b)·a`.
	pub fn xor(a: Wire, b: Wire) -> Self {
		let not = |w: Wire| Affine::constant(Scalar::one()) - Affine::variable(w);
		let mut form = Self::zero();
		form.push(Product::new(not(a), Affine::variable(b)));
		form.push(Product::new(not(b), Affine::variable(a)));
		form
	}

	/// Appends a term unless it is zero.
	pub fn push(&mut self, term: Product) {
		if !term.is_zero() {
			self.terms.push(term);
		}
	}

	/// The stored terms in order.
	pub fn terms(&self) -> &[Product] {
		&self.terms
	}

	/// Whether the form is structurally the literal `0`.
	pub fn is_zero(&self) -> bool {
		self.terms.is_empty()
	}

	/// The sorted distinct wires referenced by the form.
	pub fn wires(&self) -> Vec<Wire> {
		self.terms
			.iter()
			.flat_map(|term| term.lhs.variables().chain(term.rhs.variables()))
			.copied()
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// Replaces every occurrence of `wire` with the literal `0`.
	pub fn substitute_zero(&mut self, wire: Wire) {
		for term in &mut self.terms {
			term.lhs.remove_variable(&wire);
			term.rhs.remove_variable(&wire);
		}
		self.terms.retain(|term| !term.is_zero());
	}

	/// Renames every wire through `f`.
	pub fn remap(&self, mut f: impl FnMut(Wire) -> Wire) -> Self {
		let mut form = Self::zero();
		for term in &self.terms {
			form.push(Product::new(
				term.lhs.map_variables(|w| f(*w)),
				term.rhs.map_variables(|w| f(*w)),
			));
		}
		form
	}

	/// Evaluates the form, failing on the first wire `value` cannot supply.
	pub fn try_evaluate<E>(
		&self,
		mut value: impl FnMut(&Wire) -> Result<Scalar, E>,
	) -> Result<Scalar, E> {
		let mut acc = Scalar::ZERO;
		for term in &self.terms {
			acc += term.try_evaluate(&mut value)?;
		}
		Ok(acc)
	}

	/// Evaluates the form with `value` supplying each wire.
	pub fn evaluate(&self, mut value: impl FnMut(&Wire) -> Scalar) -> Scalar {
		let mut acc = Scalar::ZERO;
		for term in &self.terms {
			acc += term.lhs.evaluate(&mut value) * term.rhs.evaluate(&mut value);
		}
		acc
	}

	/// Structural simplification.
	///
	/// Products with a constant side are folded into a single linear term. The remaining
	/// products are normalized so that both sides are monic and ordered, then like products are
	/// collected. Terms that cancel out are dropped.
	pub fn simplify(&self) -> Self {
		let mut linear = Affine::zero();
		let mut products: BTreeMap<(SortKey, SortKey), (Affine, Affine, Scalar)> = BTreeMap::new();
		for term in &self.terms {
			if let Some(c) = term.rhs.as_constant() {
				linear = linear + term.lhs.scale(&c);
				continue;
			}
			if let Some(c) = term.lhs.as_constant() {
				linear = linear + term.rhs.scale(&c);
				continue;
			}
			let (lhs, lhs_coeff) = monic(&term.lhs);
			let (rhs, rhs_coeff) = monic(&term.rhs);
			let coeff = lhs_coeff * rhs_coeff;
			let (lhs_key, rhs_key) = (sort_key(&lhs), sort_key(&rhs));
			let (entry_key, sides) = if lhs_key <= rhs_key {
				((lhs_key, rhs_key), (lhs, rhs))
			} else {
				((rhs_key, lhs_key), (rhs, lhs))
			};
			match products.entry(entry_key) {
				Entry::Occupied(mut entry) => entry.get_mut().2 += coeff,
				Entry::Vacant(entry) => {
					entry.insert((sides.0, sides.1, coeff));
				}
			}
		}

		let mut form = Self::zero();
		for (lhs, rhs, coeff) in products.into_values() {
			form.push(Product::new(lhs.scale(&coeff), rhs));
		}
		form.push(Product::new(linear, Affine::constant(Scalar::one())));
		form
	}
}

type SortKey = Vec<(Option<Wire>, Scalar)>;

fn sort_key(lc: &Affine) -> SortKey {
	lc.iter().map(|(w, c)| (w.copied(), c.clone())).collect()
}

fn monic(lc: &Affine) -> (Affine, Scalar) {
	let Some(lead) = lc.leading_coefficient().cloned() else {
		return (lc.clone(), Scalar::one());
	};
	match lead.inverse() {
		Some(inv) => (lc.scale(&inv), lead),
		None => (lc.clone(), Scalar::one()),
	}
}

impl FromIterator<Product> for QuadForm {
	fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
		let mut form = Self::zero();
		for term in iter {
			form.push(term);
		}
		form
	}
}

struct DisplayAffine<'a>(&'a Affine);

impl fmt::Display for DisplayAffine<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_zero() {
			return f.write_str("0");
		}
		for (i, (wire, coeff)) in self.0.iter().enumerate() {
			match (i, coeff.is_negative()) {
				(0, true) => f.write_str("-")?,
				(0, false) => {}
				(_, true) => f.write_str(" - ")?,
				(_, false) => f.write_str(" + ")?,
			}
			let magnitude = coeff.magnitude();
			let unit = coeff.is_one() || (-coeff).is_one();
			match wire {
				None => write!(f, "{magnitude}")?,
				Some(wire) if unit => write!(f, "_{wire}_")?,
				Some(wire) => write!(f, "{magnitude}*_{wire}_")?,
			}
		}
		Ok(())
	}
}

/// One side of a product. A right-hand side is also parenthesized when its single term carries a
/// coefficient, so that the coefficient is not read back as part of the left-hand side.
struct Side<'a> {
	lc: &'a Affine,
	right: bool,
}

impl<'a> Side<'a> {
	fn left(lc: &'a Affine) -> Self {
		Self { lc, right: false }
	}

	fn right(lc: &'a Affine) -> Self {
		Self { lc, right: true }
	}

	fn needs_parens(&self) -> bool {
		match self.lc.len() {
			0 => false,
			1 => self.right && self.lc.iter().any(|(_, coeff)| !coeff.is_one()),
			_ => true,
		}
	}
}

impl fmt::Display for Side<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.needs_parens() {
			write!(f, "({})", DisplayAffine(self.lc))
		} else {
			write!(f, "{}", DisplayAffine(self.lc))
		}
	}
}

fn is_unit(lc: &Affine) -> bool {
	lc.as_constant().is_some_and(|c| c.is_one())
}

impl fmt::Display for Product {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_zero() {
			f.write_str("0")
		} else if is_unit(&self.rhs) {
			write!(f, "{}", Side::left(&self.lhs))
		} else if is_unit(&self.lhs) {
			write!(f, "{}", Side::left(&self.rhs))
		} else {
			write!(f, "{} * {}", Side::left(&self.lhs), Side::right(&self.rhs))
		}
	}
}

impl fmt::Display for QuadForm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.terms.is_empty() {
			return f.write_str("0");
		}
		for (i, term) in self.terms.iter().enumerate() {
			let rendered = term.to_string();
			match rendered.strip_prefix('-') {
				_ if i == 0 => f.write_str(&rendered)?,
				Some(rest) => write!(f, " - {rest}")?,
				None => write!(f, " + {rendered}")?,
			}
		}
		Ok(())
	}
}
