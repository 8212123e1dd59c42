// Copyright 2025 Irreducible Inc.
//! The dense witness vector and its text format.

use std::{
	io,
	ops::{Index, IndexMut},
};

use qesa_field::Scalar;

use crate::{constraint_system::ValueIndex, error::ParseError};

/// A full assignment of field values to wires, indexed by wire id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Witness(Vec<Scalar>);

impl Witness {
	/// Creates a witness of `len` zeros.
	pub fn zeros(len: usize) -> Self {
		Witness(vec![Scalar::ZERO; len])
	}

	/// Wraps an existing value vector.
	pub fn from_values(values: Vec<Scalar>) -> Self {
		Witness(values)
	}

	#[allow(missing_docs)]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[allow(missing_docs)]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the value at `index` or `None` when out of bounds.
	pub fn get(&self, index: ValueIndex) -> Option<&Scalar> {
		self.0.get(index.0 as usize)
	}

	/// The values in wire order.
	pub fn values(&self) -> &[Scalar] {
		&self.0
	}

	/// Consumes the witness returning its values.
	pub fn into_values(self) -> Vec<Scalar> {
		self.0
	}

	/// Renders the witness as a single line of comma-separated lowercase hex values.
	pub fn to_text(&self) -> String {
		let mut out = self
			.0
			.iter()
			.map(|value| format!("{value:x}"))
			.collect::<Vec<_>>()
			.join(",");
		out.push('\n');
		out
	}

	/// Writes [`Self::to_text`] into `writer`.
	pub fn write_text(&self, mut writer: impl io::Write) -> io::Result<()> {
		writer.write_all(self.to_text().as_bytes())
	}

	/// Parses the witness text format. Values may span several lines.
	pub fn parse_text(text: &str) -> Result<Self, ParseError> {
		let mut values = Vec::new();
		for (i, line) in text.lines().enumerate() {
			for literal in line.split(',').map(str::trim).filter(|v| !v.is_empty()) {
				let value = Scalar::from_hex(literal)
					.map_err(|source| ParseError::Scalar { line: i + 1, source })?;
				values.push(value);
			}
		}
		Ok(Witness(values))
	}
}

impl Index<ValueIndex> for Witness {
	type Output = Scalar;

	fn index(&self, index: ValueIndex) -> &Self::Output {
		&self.0[index.0 as usize]
	}
}

impl IndexMut<ValueIndex> for Witness {
	fn index_mut(&mut self, index: ValueIndex) -> &mut Self::Output {
		&mut self.0[index.0 as usize]
	}
}

#[cfg(test)]
mod tests {
	use rand::{Rng, SeedableRng, rngs::StdRng};

	use super::*;

	#[test]
	fn test_text_format() {
		let witness = Witness::from_values(vec![
			Scalar::one(),
			Scalar::from(255u64),
			Scalar::ZERO,
			Scalar::from_i64(-1),
		]);
		let text = witness.to_text();
		assert!(text.starts_with("1,ff,0,1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ec"));
		assert!(text.ends_with('\n'));
	}

	#[test]
	fn test_text_round_trip() {
		let mut rng = StdRng::seed_from_u64(0);
		let values = (0..32)
			.map(|_| Scalar::from(rng.random::<u64>()))
			.collect::<Vec<_>>();
		let witness = Witness::from_values(values);
		assert_eq!(Witness::parse_text(&witness.to_text()).unwrap(), witness);
	}

	#[test]
	fn test_parse_error_reports_line() {
		let err = Witness::parse_text("1,2\n3,q").unwrap_err();
		assert!(matches!(err, ParseError::Scalar { line: 2, .. }));
	}

	#[test]
	fn test_index() {
		let mut witness = Witness::zeros(3);
		witness[ValueIndex(2)] = Scalar::from(9u64);
		assert_eq!(witness.get(ValueIndex(2)), Some(&Scalar::from(9u64)));
		assert_eq!(witness.get(ValueIndex(3)), None);
	}
}
