// Copyright 2025 Irreducible Inc.
//! Elements of the prime field of order [`ORDER`].

use std::{
	fmt,
	iter::{Product, Sum},
	ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
	str::FromStr,
	sync::LazyLock,
};

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::Error;

/// The prime modulus of the scalar field.
pub static ORDER: LazyLock<BigUint> = LazyLock::new(|| {
	BigUint::parse_bytes(b"1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed", 16)
		.expect("modulus literal is valid hex")
});

/// `(ORDER - 1) / 2`. Values above it are displayed as negative numbers.
static HALF_ORDER: LazyLock<BigUint> = LazyLock::new(|| &*ORDER >> 1u32);

/// An element of the scalar field.
///
/// The wrapped integer is always reduced, i.e. lies in `[0, ORDER)`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar(BigUint);

impl Scalar {
	/// The additive identity.
	pub const ZERO: Scalar = Scalar(BigUint::ZERO);

	/// The multiplicative identity.
	pub fn one() -> Self {
		Scalar(BigUint::from(1u32))
	}

	/// Reduces an arbitrary unsigned integer into the field.
	pub fn reduce(value: BigUint) -> Self {
		if value < *ORDER {
			Scalar(value)
		} else {
			Scalar(value % &*ORDER)
		}
	}

	/// Reduces a signed integer into the field. Negative values wrap around `ORDER`.
	pub fn from_bigint(value: BigInt) -> Self {
		let (sign, magnitude) = value.into_parts();
		let reduced = Self::reduce(magnitude);
		match sign {
			Sign::Minus => -reduced,
			Sign::NoSign | Sign::Plus => reduced,
		}
	}

	/// Reduces a signed machine integer into the field.
	pub fn from_i64(value: i64) -> Self {
		let magnitude = Scalar(BigUint::from(value.unsigned_abs()));
		if value < 0 { -magnitude } else { magnitude }
	}

	/// Returns `2^exp` as a field element.
	pub fn power_of_two(exp: u64) -> Self {
		Self::reduce(BigUint::from(1u32) << exp)
	}

	/// The canonical integer representative in `[0, ORDER)`.
	pub fn as_biguint(&self) -> &BigUint {
		&self.0
	}

	/// Consumes the scalar returning its canonical representative.
	pub fn into_biguint(self) -> BigUint {
		self.0
	}

	/// Whether this is the additive identity.
	pub fn is_zero(&self) -> bool {
		self.0 == BigUint::ZERO
	}

	/// Whether this is the multiplicative identity.
	pub fn is_one(&self) -> bool {
		self.0 == BigUint::from(1u32)
	}

	/// Whether this value is displayed as a negative number, i.e. lies above `ORDER / 2`.
	pub fn is_negative(&self) -> bool {
		self.0 > *HALF_ORDER
	}

	/// The absolute value of the signed representative.
	pub fn magnitude(&self) -> BigUint {
		if self.is_negative() {
			&*ORDER - &self.0
		} else {
			self.0.clone()
		}
	}

	/// Returns the `index`-th bit of the canonical representative.
	pub fn bit(&self, index: u64) -> bool {
		self.0.bit(index)
	}

	/// Modular exponentiation.
	pub fn pow(&self, exp: &BigUint) -> Self {
		Scalar(self.0.modpow(exp, &ORDER))
	}

	/// The multiplicative inverse computed as `self^(ORDER - 2)`, or `None` for zero.
	pub fn inverse(&self) -> Option<Self> {
		if self.is_zero() {
			return None;
		}
		let exp = &*ORDER - BigUint::from(2u32);
		Some(self.pow(&exp))
	}

	/// Parses a base-16 literal. A leading `-` negates the value and an optional `0x` prefix is
	/// accepted.
	pub fn from_hex(literal: &str) -> Result<Self, Error> {
		parse_signed(literal, 16)
	}

	/// Renders the signed representative in base 16, e.g. `-1` for `ORDER - 1`.
	pub fn to_signed_hex(&self) -> String {
		if self.is_negative() {
			format!("-{:x}", self.magnitude())
		} else {
			format!("{:x}", self.0)
		}
	}
}

fn parse_signed(literal: &str, radix: u32) -> Result<Scalar, Error> {
	let trimmed = literal.trim();
	let (negative, digits) = match trimmed.strip_prefix('-') {
		Some(rest) => (true, rest.trim_start()),
		None => (false, trimmed),
	};
	let digits = if radix == 16 {
		digits
			.strip_prefix("0x")
			.or_else(|| digits.strip_prefix("0X"))
			.unwrap_or(digits)
	} else {
		digits
	};
	if digits.is_empty() {
		return Err(Error::EmptyLiteral);
	}
	let magnitude =
		BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| Error::InvalidLiteral {
			literal: literal.to_string(),
			radix,
		})?;
	let value = Scalar::reduce(magnitude);
	Ok(if negative { -value } else { value })
}

impl FromStr for Scalar {
	type Err = Error;

	/// Parses a signed base-10 literal.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_signed(s, 10)
	}
}

impl From<u64> for Scalar {
	fn from(value: u64) -> Self {
		Self::reduce(BigUint::from(value))
	}
}

impl From<u32> for Scalar {
	fn from(value: u32) -> Self {
		Scalar(BigUint::from(value))
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Scalar(BigUint::from(value as u32))
	}
}

impl From<BigUint> for Scalar {
	fn from(value: BigUint) -> Self {
		Self::reduce(value)
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl fmt::LowerHex for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::LowerHex::fmt(&self.0, f)
	}
}

impl fmt::Debug for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Scalar({})", self.to_signed_hex())
	}
}

impl<'a> Add<&'a Scalar> for &Scalar {
	type Output = Scalar;

	fn add(self, rhs: &'a Scalar) -> Scalar {
		let sum = &self.0 + &rhs.0;
		if sum >= *ORDER {
			Scalar(sum - &*ORDER)
		} else {
			Scalar(sum)
		}
	}
}

impl<'a> Sub<&'a Scalar> for &Scalar {
	type Output = Scalar;

	fn sub(self, rhs: &'a Scalar) -> Scalar {
		if self.0 >= rhs.0 {
			Scalar(&self.0 - &rhs.0)
		} else {
			Scalar(&self.0 + &*ORDER - &rhs.0)
		}
	}
}

impl<'a> Mul<&'a Scalar> for &Scalar {
	type Output = Scalar;

	fn mul(self, rhs: &'a Scalar) -> Scalar {
		Scalar((&self.0 * &rhs.0) % &*ORDER)
	}
}

impl Neg for &Scalar {
	type Output = Scalar;

	fn neg(self) -> Scalar {
		if self.is_zero() {
			Scalar::ZERO
		} else {
			Scalar(&*ORDER - &self.0)
		}
	}
}

impl Neg for Scalar {
	type Output = Scalar;

	fn neg(self) -> Scalar {
		-&self
	}
}

macro_rules! forward_binop {
	($tr:ident, $method:ident, $assign_tr:ident, $assign_method:ident) => {
		impl $tr<Scalar> for Scalar {
			type Output = Scalar;

			fn $method(self, rhs: Scalar) -> Scalar {
				(&self).$method(&rhs)
			}
		}

		impl<'a> $tr<&'a Scalar> for Scalar {
			type Output = Scalar;

			fn $method(self, rhs: &'a Scalar) -> Scalar {
				(&self).$method(rhs)
			}
		}

		impl $tr<Scalar> for &Scalar {
			type Output = Scalar;

			fn $method(self, rhs: Scalar) -> Scalar {
				self.$method(&rhs)
			}
		}

		impl<'a> $assign_tr<&'a Scalar> for Scalar {
			fn $assign_method(&mut self, rhs: &'a Scalar) {
				*self = (&*self).$method(rhs);
			}
		}

		impl $assign_tr<Scalar> for Scalar {
			fn $assign_method(&mut self, rhs: Scalar) {
				*self = (&*self).$method(&rhs);
			}
		}
	};
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);

impl Sum for Scalar {
	fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Self {
		iter.fold(Scalar::ZERO, |acc, x| acc + x)
	}
}

impl<'a> Sum<&'a Scalar> for Scalar {
	fn sum<I: Iterator<Item = &'a Scalar>>(iter: I) -> Self {
		iter.fold(Scalar::ZERO, |acc, x| acc + x)
	}
}

impl Product for Scalar {
	fn product<I: Iterator<Item = Scalar>>(iter: I) -> Self {
		iter.fold(Scalar::one(), |acc, x| acc * x)
	}
}
