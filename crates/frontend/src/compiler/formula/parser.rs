// Copyright 2025 Irreducible Inc.
//! Reads the textual rendering of a [`QuadForm`] back.

use pest::{Parser, iterators::Pair};
use pest_derive::Parser;
use qesa_field::Scalar;

use super::{Affine, Product, QuadForm};
use crate::{compiler::arith_circuit::Wire, error::Error};

#[derive(Parser)]
#[grammar = "compiler/formula/formula.pest"]
struct FormulaParser;

/// Parses a formula such as `(5 + _1_) * _2_ - 3*_4_`.
///
/// The formula may be any sum of products of affine sub-expressions as long as every product
/// has degree at most two.
pub fn parse_formula(text: &str) -> Result<QuadForm, Error> {
	let fail = |message: String| Error::Formula {
		formula: text.to_string(),
		message,
	};
	let mut pairs = FormulaParser::parse(Rule::formula, text).map_err(|e| fail(e.to_string()))?;
	let expr = pairs
		.next()
		.and_then(|formula| formula.into_inner().next())
		.ok_or_else(|| fail("empty formula".to_string()))?;
	let poly = lower_expr(expr).map_err(fail)?;
	Ok(poly.into_form())
}

/// A polynomial of degree at most two under construction.
#[derive(Default)]
struct Poly {
	products: Vec<Product>,
	linear: Affine,
}

impl Poly {
	fn linear(linear: Affine) -> Self {
		Self {
			products: Vec::new(),
			linear,
		}
	}

	fn as_linear(&self) -> Option<&Affine> {
		self.products.is_empty().then_some(&self.linear)
	}

	fn as_constant(&self) -> Option<Scalar> {
		self.as_linear().and_then(Affine::as_constant)
	}

	fn add(mut self, other: Poly) -> Self {
		self.products.extend(other.products);
		self.linear = self.linear + other.linear;
		self
	}

	fn neg(self) -> Self {
		Self {
			products: self
				.products
				.into_iter()
				.map(|p| Product::new(-p.lhs, p.rhs))
				.collect(),
			linear: -self.linear,
		}
	}

	fn scale(self, factor: &Scalar) -> Self {
		Self {
			products: self
				.products
				.into_iter()
				.map(|p| Product::new(p.lhs.scale(factor), p.rhs))
				.collect(),
			linear: self.linear.scale(factor),
		}
	}

	fn mul(self, other: Poly) -> Result<Self, String> {
		if let Some(c) = other.as_constant() {
			return Ok(self.scale(&c));
		}
		if let Some(c) = self.as_constant() {
			return Ok(other.scale(&c));
		}
		match (self.as_linear(), other.as_linear()) {
			(Some(lhs), Some(rhs)) => Ok(Self {
				products: vec![Product::new(lhs.clone(), rhs.clone())],
				linear: Affine::zero(),
			}),
			_ => Err("formula is not quadratic".to_string()),
		}
	}

	fn into_form(self) -> QuadForm {
		let mut form: QuadForm = self.products.into_iter().collect();
		form.push(Product::new(self.linear, Affine::constant(Scalar::one())));
		form
	}
}

fn lower_expr(pair: Pair<Rule>) -> Result<Poly, String> {
	let mut acc = Poly::default();
	let mut negate = false;
	for inner in pair.into_inner() {
		match inner.as_rule() {
			Rule::sign => negate = true,
			Rule::add_op => negate = inner.as_str() == "-",
			Rule::term => {
				let term = lower_term(inner)?;
				acc = acc.add(if negate { term.neg() } else { term });
				negate = false;
			}
			rule => return Err(format!("unexpected {rule:?} in expression")),
		}
	}
	Ok(acc)
}

fn lower_term(pair: Pair<Rule>) -> Result<Poly, String> {
	let mut acc: Option<Poly> = None;
	for inner in pair.into_inner() {
		let factor = lower_factor(inner)?;
		acc = Some(match acc {
			None => factor,
			Some(acc) => acc.mul(factor)?,
		});
	}
	acc.ok_or_else(|| "empty product".to_string())
}

fn lower_factor(pair: Pair<Rule>) -> Result<Poly, String> {
	match pair.as_rule() {
		Rule::number => {
			let value = pair
				.as_str()
				.parse::<Scalar>()
				.map_err(|e| e.to_string())?;
			Ok(Poly::linear(Affine::constant(value)))
		}
		Rule::wire => {
			let id = pair
				.into_inner()
				.next()
				.ok_or_else(|| "wire without id".to_string())?;
			let wire = id
				.as_str()
				.parse::<u32>()
				.ok()
				.and_then(Wire::try_from_u32)
				.ok_or_else(|| format!("wire id {} out of range", id.as_str()))?;
			Ok(Poly::linear(Affine::variable(wire)))
		}
		Rule::expr => lower_expr(pair),
		rule => Err(format!("unexpected {rule:?} in product")),
	}
}
