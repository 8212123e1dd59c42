// Copyright 2025 Irreducible Inc.
//! Constraint system and related definitions.

use std::{
	collections::BTreeMap,
	fmt::{self, Write as _},
	io,
};

use qesa_field::Scalar;

use crate::error::{ConstraintSystemError, ParseError};

/// A type safe wrapper over an index into the [`Witness`][crate::Witness].
///
/// Index `0` is the constant slot and always holds the value `1`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ValueIndex(pub u32);

impl ValueIndex {
	/// The slot holding the constant `1`.
	pub const CONSTANT: ValueIndex = ValueIndex(0);

	/// The value index that is not considered to be valid.
	pub const INVALID: ValueIndex = ValueIndex(u32::MAX);
}

/// The most sensible default for a value index is invalid.
impl Default for ValueIndex {
	fn default() -> Self {
		Self::INVALID
	}
}

impl fmt::Display for ValueIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A sparse linear form `Σ cᵢ·w[iᵢ]` over witness slots.
///
/// Entries are kept sorted by index and zero coefficients are never stored, so two rows
/// denoting the same form compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseRow(BTreeMap<ValueIndex, Scalar>);

impl SparseRow {
	/// Creates an empty row.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a row from `(index, coefficient)` pairs, merging repeated indices.
	pub fn from_terms(terms: impl IntoIterator<Item = (ValueIndex, Scalar)>) -> Self {
		let mut row = Self::new();
		for (index, coeff) in terms {
			row.add(index, coeff);
		}
		row
	}

	/// Adds `coeff` to the entry at `index`.
	pub fn add(&mut self, index: ValueIndex, coeff: Scalar) {
		if coeff.is_zero() {
			return;
		}
		let entry = self.0.entry(index).or_insert(Scalar::ZERO);
		*entry += coeff;
		if entry.is_zero() {
			self.0.remove(&index);
		}
	}

	/// Iterates entries sorted by index.
	pub fn iter(&self) -> impl Iterator<Item = (ValueIndex, &Scalar)> {
		self.0.iter().map(|(index, coeff)| (*index, coeff))
	}

	/// Returns the coefficient at `index`, zero if absent.
	pub fn get(&self, index: ValueIndex) -> Scalar {
		self.0.get(&index).cloned().unwrap_or(Scalar::ZERO)
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the row is identically zero.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn write_text(&self, out: &mut String) {
		for (i, (index, coeff)) in self.iter().enumerate() {
			if i > 0 {
				out.push(',');
			}
			let _ = write!(out, "{}:{}", index, coeff.to_signed_hex());
		}
	}
}

/// A pair of rows denoting the product `A(w) · B(w)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowPair {
	#[allow(missing_docs)]
	pub a: SparseRow,
	#[allow(missing_docs)]
	pub b: SparseRow,
}

impl RowPair {
	/// Creates a row pair from its two sides.
	pub fn new(a: SparseRow, b: SparseRow) -> Self {
		Self { a, b }
	}
}

/// A quadratic constraint `Σᵢ Aᵢ(w) · Bᵢ(w) = 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraint {
	/// The summed products.
	pub rows: Vec<RowPair>,
}

impl Constraint {
	/// Creates a constraint from its rows.
	pub fn new(rows: Vec<RowPair>) -> Self {
		Self { rows }
	}

	/// A constraint made of a single product `a · b = 0`.
	pub fn single(a: SparseRow, b: SparseRow) -> Self {
		Self::new(vec![RowPair::new(a, b)])
	}
}

/// A constraint system is a set of quadratic constraints over a witness vector.
///
/// # Clone
///
/// While this type is cloneable it may be expensive to do so since the constraint systems often
/// can have many thousands of constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSystem {
	/// Number of distinct wires, i.e. the expected witness length.
	pub num_variables: usize,
	/// List of constraints that must be satisfied by the witness.
	pub constraints: Vec<Constraint>,
}

impl ConstraintSystem {
	/// Creates a new constraint system.
	pub fn new(num_variables: usize, constraints: Vec<Constraint>) -> Self {
		ConstraintSystem {
			num_variables,
			constraints,
		}
	}

	/// Returns the number of constraints in the system.
	pub fn n_constraints(&self) -> usize {
		self.constraints.len()
	}

	/// Returns the total number of row pairs over all constraints.
	pub fn n_rows(&self) -> usize {
		self.constraints.iter().map(|c| c.rows.len()).sum()
	}

	/// Ensures every constraint has at least one row and only references indices below
	/// [`Self::num_variables`].
	pub fn validate(&self) -> Result<(), ConstraintSystemError> {
		for (constraint_index, constraint) in self.constraints.iter().enumerate() {
			if constraint.rows.is_empty() {
				return Err(ConstraintSystemError::EmptyConstraint { constraint_index });
			}
			for (row_index, row) in constraint.rows.iter().enumerate() {
				for (operand_name, side) in [("a", &row.a), ("b", &row.b)] {
					for (index, _) in side.iter() {
						if index.0 as usize >= self.num_variables {
							return Err(ConstraintSystemError::OutOfRangeValueIndex {
								constraint_index,
								row_index,
								operand_name,
								value_index: index.0,
								num_variables: self.num_variables,
							});
						}
					}
				}
			}
		}
		Ok(())
	}

	/// Renders the system in the constraint-file text format.
	///
	/// ```text
	/// 4 # num variables/wires
	/// # matrix 1
	/// 0:-1;3:1
	/// 1:1;2:1
	/// ```
	///
	/// Matrices are numbered from 1. Coefficients above `ORDER / 2` are written as negative hex.
	pub fn to_text(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "{} # num variables/wires", self.num_variables);
		for (i, constraint) in self.constraints.iter().enumerate() {
			let _ = writeln!(out, "# matrix {}", i + 1);
			for row in &constraint.rows {
				row.a.write_text(&mut out);
				out.push(';');
				row.b.write_text(&mut out);
				out.push('\n');
			}
		}
		out
	}

	/// Writes [`Self::to_text`] into `writer`.
	pub fn write_text(&self, mut writer: impl io::Write) -> io::Result<()> {
		writer.write_all(self.to_text().as_bytes())
	}

	/// Parses the constraint-file text format.
	///
	/// Comment lines and blank lines separate constraints; the `# matrix` numbering itself is
	/// not interpreted.
	pub fn parse_text(text: &str) -> Result<Self, ParseError> {
		let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

		let (header_line, header) = lines
			.by_ref()
			.find(|(_, line)| !line.is_empty())
			.ok_or(ParseError::MissingHeader)?;
		let count = header.split('#').next().unwrap_or_default().trim();
		let num_variables = count.parse::<usize>().map_err(|_| ParseError::Syntax {
			line: header_line,
			message: format!("expected the number of variables, got {count:?}"),
		})?;

		let mut constraints = Vec::new();
		let mut current = Vec::new();
		for (line_no, line) in lines {
			if line.is_empty() || line.starts_with('#') {
				if !current.is_empty() {
					constraints.push(Constraint::new(std::mem::take(&mut current)));
				}
				continue;
			}
			let (a, b) = line.split_once(';').ok_or_else(|| ParseError::Syntax {
				line: line_no,
				message: "row pair must contain exactly one ';'".to_string(),
			})?;
			current.push(RowPair::new(parse_row(a, line_no)?, parse_row(b, line_no)?));
		}
		if !current.is_empty() {
			constraints.push(Constraint::new(current));
		}

		Ok(Self::new(num_variables, constraints))
	}
}

fn parse_row(text: &str, line: usize) -> Result<SparseRow, ParseError> {
	let mut row = SparseRow::new();
	for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
		let (index, coeff) = entry.split_once(':').ok_or_else(|| ParseError::Syntax {
			line,
			message: format!("expected `index:coefficient`, got {entry:?}"),
		})?;
		let index = index.trim().parse::<u32>().map_err(|_| ParseError::Syntax {
			line,
			message: format!("invalid value index {index:?}"),
		})?;
		let coeff =
			Scalar::from_hex(coeff).map_err(|source| ParseError::Scalar { line, source })?;
		row.add(ValueIndex(index), coeff);
	}
	Ok(row)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(terms: &[(u32, i64)]) -> SparseRow {
		SparseRow::from_terms(
			terms
				.iter()
				.map(|&(index, coeff)| (ValueIndex(index), Scalar::from_i64(coeff))),
		)
	}

	fn sample_system() -> ConstraintSystem {
		ConstraintSystem::new(
			4,
			vec![
				Constraint::new(vec![
					RowPair::new(row(&[(0, -1)]), row(&[(3, 1)])),
					RowPair::new(row(&[(1, 1), (0, 5)]), row(&[(2, 1)])),
				]),
				Constraint::single(row(&[(0, 1)]), row(&[(1, -1), (2, 2)])),
			],
		)
	}

	#[test]
	fn test_sparse_row_merges_and_cancels() {
		let r = row(&[(1, 2), (1, -2), (0, 3)]);
		assert_eq!(r.len(), 1);
		assert_eq!(r.get(ValueIndex(0)), Scalar::from(3u64));
		assert_eq!(r.get(ValueIndex(1)), Scalar::ZERO);
	}

	#[test]
	fn test_text_format() {
		let text = sample_system().to_text();
		assert_eq!(
			text,
			"4 # num variables/wires\n\
			 # matrix 1\n\
			 0:-1;3:1\n\
			 0:5,1:1;2:1\n\
			 # matrix 2\n\
			 0:1;1:-1,2:2\n"
		);
	}

	#[test]
	fn test_text_round_trip() {
		let cs = sample_system();
		let parsed = ConstraintSystem::parse_text(&cs.to_text()).unwrap();
		assert_eq!(parsed, cs);
	}

	#[test]
	fn test_parse_accepts_blank_line_separators() {
		let cs = ConstraintSystem::parse_text("3\n\n0:1;1:1\n\n1:ff;2:-a\n").unwrap();
		assert_eq!(cs.num_variables, 3);
		assert_eq!(cs.n_constraints(), 2);
		assert_eq!(cs.constraints[1].rows[0].a.get(ValueIndex(1)), Scalar::from(255u64));
		assert_eq!(cs.constraints[1].rows[0].b.get(ValueIndex(2)), Scalar::from_i64(-10));
	}

	#[test]
	fn test_parse_errors() {
		assert!(matches!(ConstraintSystem::parse_text(""), Err(ParseError::MissingHeader)));
		assert!(matches!(
			ConstraintSystem::parse_text("x # num variables/wires"),
			Err(ParseError::Syntax { line: 1, .. })
		));
		assert!(matches!(
			ConstraintSystem::parse_text("2\n# matrix 1\n0:1"),
			Err(ParseError::Syntax { line: 3, .. })
		));
		assert!(matches!(
			ConstraintSystem::parse_text("2\n# matrix 1\n0:zz;1:1"),
			Err(ParseError::Scalar { line: 3, .. })
		));
	}

	#[test]
	fn test_validate() {
		let mut cs = sample_system();
		cs.validate().unwrap();
		cs.num_variables = 3;
		assert!(matches!(
			cs.validate(),
			Err(ConstraintSystemError::OutOfRangeValueIndex { value_index: 3, .. })
		));
		cs.constraints.push(Constraint::default());
		cs.num_variables = 4;
		assert!(matches!(
			cs.validate(),
			Err(ConstraintSystemError::EmptyConstraint { constraint_index: 2 })
		));
	}
}
