// Copyright 2025 Irreducible Inc.
use std::fmt;

use qesa_field::Scalar;

use crate::compiler::{
	formula::{QuadForm, parse_formula},
	gate,
};

/// The kind of a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
	// Linear
	/// `out = a + b`
	Add,
	/// `out = a - b`
	Sub,
	/// `out = c · a`
	ConstMul(Scalar),

	// Non-linear, rewritten into quadratic gates
	/// `out = a · b`
	Mul,
	/// `out = a + b - 2ab` for boolean `a` and `b`
	Xor,

	// Bit decomposition
	/// Little-endian bits of the input, one output per bit.
	Split,
	/// `out = Σ bᵢ · 2ⁱ`
	Pack,

	// Zero test
	/// Outputs `(x⁻¹, 1)` for non-zero `x` and `(0, 0)` otherwise.
	Zerop,

	// Canonical form
	/// `out = form(inputs)`
	Quadratic(QuadForm),
}

/// The number of wires on one side of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
	#[allow(missing_docs)]
	Exactly(usize),
	#[allow(missing_docs)]
	AtLeast(usize),
}

impl Arity {
	/// Whether `n` wires fit this arity.
	pub fn admits(self, n: usize) -> bool {
		match self {
			Arity::Exactly(expected) => n == expected,
			Arity::AtLeast(min) => n >= min,
		}
	}
}

impl fmt::Display for Arity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arity::Exactly(n) => write!(f, "{n}"),
			Arity::AtLeast(n) => write!(f, "at least {n}"),
		}
	}
}

/// The shape of an opcode is a description of its inputs and outputs. It allows treating a gate as
/// a black box, correctly identifying its inputs or outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeShape {
	/// The number of inputs this opcode expects.
	pub n_in: Arity,
	/// The number of outputs this opcode provides.
	pub n_out: Arity,
}

impl Opcode {
	#[allow(missing_docs)]
	pub fn shape(&self) -> OpcodeShape {
		match self {
			Opcode::Add | Opcode::Sub => gate::linear::shape_binary(),
			Opcode::ConstMul(_) => gate::linear::shape_const_mul(),
			Opcode::Mul => gate::mul::shape(),
			Opcode::Xor => gate::xor::shape(),
			Opcode::Split => gate::split::shape(),
			Opcode::Pack => gate::pack::shape(),
			Opcode::Zerop => gate::zerop::shape(),
			Opcode::Quadratic(_) => gate::quadratic::shape(),
		}
	}

	/// The kind name, without the constant of `const-mul`.
	pub fn name(&self) -> &'static str {
		match self {
			Opcode::Add => "add",
			Opcode::Sub => "sub",
			Opcode::ConstMul(_) => "const-mul",
			Opcode::Mul => "mul",
			Opcode::Xor => "xor",
			Opcode::Split => "split",
			Opcode::Pack => "pack",
			Opcode::Zerop => "zerop",
			Opcode::Quadratic(_) => "quadratic",
		}
	}

	/// Whether the gate computes an affine function of its inputs.
	pub fn is_linear(&self) -> bool {
		matches!(self, Opcode::Add | Opcode::Sub | Opcode::ConstMul(_))
	}

	/// Parses a kind tag of the text format.
	///
	/// Quadratic gates take their formula from the annotation. `quad_gate` is accepted as an
	/// alias of `quadratic`.
	pub fn parse(tag: &str, annotation: &str) -> Result<Self, String> {
		let opcode = match tag {
			"add" => Opcode::Add,
			"sub" => Opcode::Sub,
			"mul" => Opcode::Mul,
			"xor" => Opcode::Xor,
			"split" => Opcode::Split,
			"pack" => Opcode::Pack,
			"zerop" => Opcode::Zerop,
			"quadratic" | "quad_gate" => {
				let form = parse_formula(annotation).map_err(|e| e.to_string())?;
				Opcode::Quadratic(form)
			}
			_ => {
				let (negative, digits) = match tag.strip_prefix("const-mul-") {
					Some(rest) => match rest.strip_prefix("neg-") {
						Some(digits) => (true, digits),
						None => (false, rest),
					},
					None => return Err(format!("unknown gate kind `{tag}`")),
				};
				if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
					return Err(format!("invalid constant in `{tag}`"));
				}
				let value = Scalar::from_hex(digits).map_err(|e| e.to_string())?;
				Opcode::ConstMul(if negative { -value } else { value })
			}
		};
		Ok(opcode)
	}
}

/// Renders the kind tag of the text format.
impl fmt::Display for Opcode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Opcode::ConstMul(c) if c.is_negative() => {
				write!(f, "const-mul-neg-{:x}", c.magnitude())
			}
			Opcode::ConstMul(c) => write!(f, "const-mul-{c:x}"),
			other => f.write_str(other.name()),
		}
	}
}
