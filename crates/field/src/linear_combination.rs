// Copyright 2025 Irreducible Inc.
//! Sparse affine combinations `c + Σ kᵢ·vᵢ` over [`Scalar`].

use std::{
	collections::{BTreeMap, btree_map::Entry},
	ops::{Add, Neg, Sub},
};

use crate::scalar::Scalar;

/// An affine combination of variables of type `V`.
///
/// Terms are keyed by `Option<V>`, where `None` stands for the constant term. Since `None`
/// orders before every `Some`, the constant term is always the first entry when iterating.
/// Zero coefficients are never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCombination<V: Ord> {
	terms: BTreeMap<Option<V>, Scalar>,
}

impl<V: Ord> Default for LinearCombination<V> {
	fn default() -> Self {
		Self {
			terms: BTreeMap::new(),
		}
	}
}

impl<V: Ord + Clone> LinearCombination<V> {
	/// The empty combination, evaluating to zero.
	pub fn zero() -> Self {
		Self {
			terms: BTreeMap::new(),
		}
	}

	/// A combination consisting only of a constant term.
	pub fn constant(value: Scalar) -> Self {
		let mut lc = Self::zero();
		lc.add_term(None, value);
		lc
	}

	/// A single variable with coefficient one.
	pub fn variable(var: V) -> Self {
		Self::monomial(var, Scalar::one())
	}

	/// A single variable scaled by `coeff`.
	pub fn monomial(var: V, coeff: Scalar) -> Self {
		let mut lc = Self::zero();
		lc.add_term(Some(var), coeff);
		lc
	}

	/// Whether the combination has no terms, i.e. is identically zero.
	pub fn is_zero(&self) -> bool {
		self.terms.is_empty()
	}

	/// Number of stored (non-zero) terms, constant included.
	pub fn len(&self) -> usize {
		self.terms.len()
	}

	#[allow(missing_docs)]
	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	/// Iterates the terms in key order, constant term first.
	pub fn iter(&self) -> impl Iterator<Item = (Option<&V>, &Scalar)> {
		self.terms.iter().map(|(k, v)| (k.as_ref(), v))
	}

	/// Iterates the variables with a non-zero coefficient.
	pub fn variables(&self) -> impl Iterator<Item = &V> {
		self.terms.keys().filter_map(Option::as_ref)
	}

	/// The constant term, zero if absent.
	pub fn constant_term(&self) -> Scalar {
		self.terms.get(&None).cloned().unwrap_or(Scalar::ZERO)
	}

	/// The coefficient of `var`, zero if absent.
	pub fn coefficient(&self, var: &V) -> Scalar {
		self.terms
			.get(&Some(var.clone()))
			.cloned()
			.unwrap_or(Scalar::ZERO)
	}

	/// Returns the value if the combination has no variable terms.
	pub fn as_constant(&self) -> Option<Scalar> {
		if self.variables().next().is_none() {
			Some(self.constant_term())
		} else {
			None
		}
	}

	/// The coefficient of the first stored term, which is what a combination must be divided by
	/// to become monic.
	pub fn leading_coefficient(&self) -> Option<&Scalar> {
		self.terms.values().next()
	}

	/// Adds `coeff` to the term keyed by `var`, dropping the entry if it cancels out.
	pub fn add_term(&mut self, var: Option<V>, coeff: Scalar) {
		if coeff.is_zero() {
			return;
		}
		match self.terms.entry(var) {
			Entry::Vacant(entry) => {
				entry.insert(coeff);
			}
			Entry::Occupied(mut entry) => {
				*entry.get_mut() += coeff;
				if entry.get().is_zero() {
					entry.remove();
				}
			}
		}
	}

	/// Multiplies every term by `factor`.
	pub fn scale(&self, factor: &Scalar) -> Self {
		if factor.is_zero() {
			return Self::zero();
		}
		Self {
			terms: self
				.terms
				.iter()
				.map(|(k, v)| (k.clone(), v * factor))
				.collect(),
		}
	}

	/// Removes the term of `var` and returns its coefficient.
	pub fn remove_variable(&mut self, var: &V) -> Option<Scalar> {
		let key = Some(var.clone());
		self.terms.remove(&key)
	}

	/// Renames variables with `f`. Terms mapped onto the same variable are merged.
	pub fn map_variables<W: Ord + Clone>(&self, mut f: impl FnMut(&V) -> W) -> LinearCombination<W> {
		let mut out = LinearCombination::zero();
		for (k, v) in &self.terms {
			out.add_term(k.as_ref().map(&mut f), v.clone());
		}
		out
	}

	/// Evaluates the combination with `value` supplying each variable.
	pub fn evaluate(&self, mut value: impl FnMut(&V) -> Scalar) -> Scalar {
		self.terms
			.iter()
			.map(|(k, coeff)| match k {
				None => coeff.clone(),
				Some(var) => coeff * value(var),
			})
			.sum()
	}

	/// Evaluates the combination, failing on the first variable `value` cannot supply.
	pub fn try_evaluate<E>(
		&self,
		mut value: impl FnMut(&V) -> Result<Scalar, E>,
	) -> Result<Scalar, E> {
		let mut acc = Scalar::ZERO;
		for (k, coeff) in &self.terms {
			match k {
				None => acc += coeff,
				Some(var) => acc += coeff * value(var)?,
			}
		}
		Ok(acc)
	}
}

impl<V: Ord + Clone> Add for LinearCombination<V> {
	type Output = Self;

	fn add(mut self, rhs: Self) -> Self {
		for (k, v) in rhs.terms {
			self.add_term(k, v);
		}
		self
	}
}

impl<V: Ord + Clone> Add<&LinearCombination<V>> for LinearCombination<V> {
	type Output = Self;

	fn add(mut self, rhs: &LinearCombination<V>) -> Self {
		for (k, v) in &rhs.terms {
			self.add_term(k.clone(), v.clone());
		}
		self
	}
}

impl<V: Ord + Clone> Neg for LinearCombination<V> {
	type Output = Self;

	fn neg(self) -> Self {
		Self {
			terms: self.terms.into_iter().map(|(k, v)| (k, -v)).collect(),
		}
	}
}

impl<V: Ord + Clone> Sub for LinearCombination<V> {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		self + (-rhs)
	}
}
