// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFn {
	Abs,
	Sqrt,
	Exp,
	Log,
	Round,
	Floor,
	Ceil,
	Sign,
	Negate,
	Not,
}

impl UnaryFn {
	pub fn from_opcode(opcode: &str) -> Option<Self> {
		Some(match opcode.to_ascii_lowercase().as_str() {
			"abs" => UnaryFn::Abs,
			"sqrt" => UnaryFn::Sqrt,
			"exp" => UnaryFn::Exp,
			"log" => UnaryFn::Log,
			"round" => UnaryFn::Round,
			"floor" => UnaryFn::Floor,
			"ceil" => UnaryFn::Ceil,
			"sign" => UnaryFn::Sign,
			"uminus" => UnaryFn::Negate,
			"!" => UnaryFn::Not,
			_ => return None,
		})
	}

	pub fn name(&self) -> &'static str {
		match self {
			UnaryFn::Abs => "abs",
			UnaryFn::Sqrt => "sqrt",
			UnaryFn::Exp => "exp",
			UnaryFn::Log => "log",
			UnaryFn::Round => "round",
			UnaryFn::Floor => "floor",
			UnaryFn::Ceil => "ceil",
			UnaryFn::Sign => "sign",
			UnaryFn::Negate => "uminus",
			UnaryFn::Not => "!",
		}
	}

	#[inline]
	pub fn apply(&self, value: f64) -> f64 {
		match self {
			UnaryFn::Abs => value.abs(),
			UnaryFn::Sqrt => value.sqrt(),
			UnaryFn::Exp => value.exp(),
			UnaryFn::Log => value.ln(),
			UnaryFn::Round => value.round(),
			UnaryFn::Floor => value.floor(),
			UnaryFn::Ceil => value.ceil(),
			UnaryFn::Sign => {
				if value > 0.0 {
					1.0
				} else if value < 0.0 {
					-1.0
				} else {
					// zero and NaN map to themselves
					value
				}
			}
			UnaryFn::Negate => -value,
			UnaryFn::Not => {
				if value == 0.0 {
					1.0
				} else {
					0.0
				}
			}
		}
	}
}

impl Display for UnaryFn {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_opcode() {
		assert_eq!(UnaryFn::from_opcode("SQRT"), Some(UnaryFn::Sqrt));
		assert_eq!(UnaryFn::from_opcode("uminus"), Some(UnaryFn::Negate));
		assert_eq!(UnaryFn::from_opcode("-"), None);
	}

	#[test]
	fn test_apply() {
		assert_eq!(UnaryFn::Abs.apply(-2.5), 2.5);
		assert_eq!(UnaryFn::Round.apply(2.5), 3.0);
		assert_eq!(UnaryFn::Sign.apply(-0.1), -1.0);
		assert_eq!(UnaryFn::Sign.apply(0.0), 0.0);
		assert!(UnaryFn::Sign.apply(f64::NAN).is_nan());
		assert_eq!(UnaryFn::Not.apply(0.0), 1.0);
		assert_eq!(UnaryFn::Not.apply(3.0), 0.0);
		assert_eq!(UnaryFn::Log.apply(1.0), 0.0);
	}
}
