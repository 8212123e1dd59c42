// Copyright 2025 Irreducible Inc.
//! Routines for checking whether the
//! [constraint system][`crate::constraint_system::ConstraintSystem`] is satisfied with the given
//! [witness][`Witness`].

use qesa_field::Scalar;

use crate::{
	constraint_system::{Constraint, ConstraintSystem, SparseRow, ValueIndex},
	error::VerifyError,
	witness::Witness,
};

/// Evaluates the linear form of a row against the witness.
pub fn eval_row(witness: &Witness, row: &SparseRow) -> Result<Scalar, VerifyError> {
	let mut acc = Scalar::ZERO;
	for (index, coeff) in row.iter() {
		let value = witness.get(index).ok_or(VerifyError::IndexOutOfRange {
			value_index: index.0,
			len: witness.len(),
		})?;
		acc += coeff * value;
	}
	Ok(acc)
}

/// Evaluates `Σ Aᵢ(w) · Bᵢ(w)` for a constraint. A satisfied constraint evaluates to zero.
pub fn eval_constraint(witness: &Witness, constraint: &Constraint) -> Result<Scalar, VerifyError> {
	let mut acc = Scalar::ZERO;
	for row in &constraint.rows {
		acc += eval_row(witness, &row.a)? * eval_row(witness, &row.b)?;
	}
	Ok(acc)
}

/// Verifies all constraints in a constraint system are satisfied by the witness
pub fn verify_constraints(cs: &ConstraintSystem, witness: &Witness) -> Result<(), VerifyError> {
	if witness.len() < cs.num_variables {
		return Err(VerifyError::WitnessTooShort {
			expected: cs.num_variables,
			actual: witness.len(),
		});
	}
	// The constant slot is implicitly referenced by every constant coefficient.
	if let Some(value) = witness.get(ValueIndex::CONSTANT)
		&& !value.is_one()
	{
		return Err(VerifyError::ConstantSlotNotOne {
			value: value.clone(),
		});
	}
	for (constraint_index, constraint) in cs.constraints.iter().enumerate() {
		let value = eval_constraint(witness, constraint)?;
		if !value.is_zero() {
			return Err(VerifyError::Unsatisfied {
				constraint_index,
				value,
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::constraint_system::RowPair;

	fn row(terms: &[(u32, i64)]) -> SparseRow {
		SparseRow::from_terms(
			terms
				.iter()
				.map(|&(index, coeff)| (ValueIndex(index), Scalar::from_i64(coeff))),
		)
	}

	// w3 = w1 * w2
	fn product_system() -> ConstraintSystem {
		ConstraintSystem::new(
			4,
			vec![Constraint::new(vec![
				RowPair::new(row(&[(0, -1)]), row(&[(3, 1)])),
				RowPair::new(row(&[(1, 1)]), row(&[(2, 1)])),
			])],
		)
	}

	fn witness(values: &[i64]) -> Witness {
		Witness::from_values(values.iter().map(|&v| Scalar::from_i64(v)).collect())
	}

	#[test]
	fn test_satisfied() {
		verify_constraints(&product_system(), &witness(&[1, 6, 7, 42])).unwrap();
	}

	#[test]
	fn test_unsatisfied() {
		let err = verify_constraints(&product_system(), &witness(&[1, 6, 7, 41])).unwrap_err();
		match err {
			VerifyError::Unsatisfied {
				constraint_index,
				value,
			} => {
				assert_eq!(constraint_index, 0);
				assert_eq!(value, Scalar::one());
			}
			other => panic!("unexpected error {other}"),
		}
	}

	#[test]
	fn test_constant_slot_and_length() {
		assert!(matches!(
			verify_constraints(&product_system(), &witness(&[2, 6, 7, 84])),
			Err(VerifyError::ConstantSlotNotOne { .. })
		));
		assert!(matches!(
			verify_constraints(&product_system(), &witness(&[1, 6, 7])),
			Err(VerifyError::WitnessTooShort {
				expected: 4,
				actual: 3
			})
		));
	}
}
