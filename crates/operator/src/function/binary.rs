// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

/// Element-wise function of two values. Comparisons and logical functions yield 1.0 or 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryFn {
	Plus,
	Minus,
	Multiply,
	Divide,
	Power,
	Modulus,
	IntDivide,
	Min,
	Max,
	Equal,
	NotEqual,
	Less,
	LessEqual,
	Greater,
	GreaterEqual,
	And,
	Or,
}

impl BinaryFn {
	pub fn from_opcode(opcode: &str) -> Option<Self> {
		Some(match opcode.to_ascii_lowercase().as_str() {
			"+" => BinaryFn::Plus,
			"-" => BinaryFn::Minus,
			"*" => BinaryFn::Multiply,
			"/" => BinaryFn::Divide,
			"^" => BinaryFn::Power,
			"%%" => BinaryFn::Modulus,
			"%/%" => BinaryFn::IntDivide,
			"min" => BinaryFn::Min,
			"max" => BinaryFn::Max,
			"==" => BinaryFn::Equal,
			"!=" => BinaryFn::NotEqual,
			"<" => BinaryFn::Less,
			"<=" => BinaryFn::LessEqual,
			">" => BinaryFn::Greater,
			">=" => BinaryFn::GreaterEqual,
			"&&" => BinaryFn::And,
			"||" => BinaryFn::Or,
			_ => return None,
		})
	}

	pub fn symbol(&self) -> &'static str {
		match self {
			BinaryFn::Plus => "+",
			BinaryFn::Minus => "-",
			BinaryFn::Multiply => "*",
			BinaryFn::Divide => "/",
			BinaryFn::Power => "^",
			BinaryFn::Modulus => "%%",
			BinaryFn::IntDivide => "%/%",
			BinaryFn::Min => "min",
			BinaryFn::Max => "max",
			BinaryFn::Equal => "==",
			BinaryFn::NotEqual => "!=",
			BinaryFn::Less => "<",
			BinaryFn::LessEqual => "<=",
			BinaryFn::Greater => ">",
			BinaryFn::GreaterEqual => ">=",
			BinaryFn::And => "&&",
			BinaryFn::Or => "||",
		}
	}

	#[inline]
	pub fn apply(&self, left: f64, right: f64) -> f64 {
		match self {
			BinaryFn::Plus => left + right,
			BinaryFn::Minus => left - right,
			BinaryFn::Multiply => left * right,
			BinaryFn::Divide => left / right,
			BinaryFn::Power => left.powf(right),
			// sign follows the divisor
			BinaryFn::Modulus => left - (left / right).floor() * right,
			BinaryFn::IntDivide => (left / right).floor(),
			BinaryFn::Min => left.min(right),
			BinaryFn::Max => left.max(right),
			BinaryFn::Equal => indicator(left == right),
			BinaryFn::NotEqual => indicator(left != right),
			BinaryFn::Less => indicator(left < right),
			BinaryFn::LessEqual => indicator(left <= right),
			BinaryFn::Greater => indicator(left > right),
			BinaryFn::GreaterEqual => indicator(left >= right),
			BinaryFn::And => indicator(left != 0.0 && right != 0.0),
			BinaryFn::Or => indicator(left != 0.0 || right != 0.0),
		}
	}
}

impl Display for BinaryFn {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[inline]
fn indicator(value: bool) -> f64 {
	if value { 1.0 } else { 0.0 }
}
