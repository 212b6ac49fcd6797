// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tabula_type::{ElementType, Error, Result, ScalarValue, ValueKind};

use crate::ExecutionContext;

/// A typed operand reference `name[:kind[:element]]`, or a numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
	pub name: String,
	pub kind: ValueKind,
	pub element: ElementType,
	pub literal: Option<ScalarValue>,
}

impl Operand {
	pub fn parse(descriptor: &str, token: &str) -> Result<Self> {
		if let Ok(value) = token.parse::<f64>() {
			return Ok(Self {
				name: token.to_string(),
				kind: ValueKind::Scalar,
				element: ElementType::Float8,
				literal: Some(ScalarValue::Float8(value)),
			});
		}

		let mut parts = token.split(':');
		let name = parts.next().unwrap_or_default();
		if name.is_empty() {
			return Err(Error::malformed(descriptor, format!("operand '{token}' has no name")));
		}

		let kind = match parts.next() {
			Some(tag) => tag
				.parse()
				.map_err(|_| Error::malformed(descriptor, format!("unknown value kind '{tag}' in '{token}'")))?,
			None => ValueKind::Matrix,
		};
		let element = match parts.next() {
			Some(tag) => tag
				.parse()
				.map_err(|_| Error::malformed(descriptor, format!("unknown element type '{tag}' in '{token}'")))?,
			None => ElementType::Float8,
		};
		if parts.next().is_some() {
			return Err(Error::malformed(descriptor, format!("operand '{token}' has too many tags")));
		}

		Ok(Self {
			name: name.to_string(),
			kind,
			element,
			literal: None,
		})
	}

	pub fn is_scalar(&self) -> bool {
		self.kind == ValueKind::Scalar
	}

	/// Numeric value of a scalar operand, from its literal or the context.
	pub fn numeric(&self, ctx: &ExecutionContext) -> Result<f64> {
		let value = match &self.literal {
			Some(literal) => literal.clone(),
			None => ctx.scalar(&self.name)?,
		};
		value.as_f64().ok_or_else(|| Error::invalid_block(format!("scalar '{}' holds non-numeric '{value}'", self.name)))
	}
}

impl Display for Operand {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match &self.literal {
			Some(literal) => write!(f, "{literal}"),
			None => write!(f, "{}:{}:{}", self.name, self.kind, self.element),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let op = Operand::parse("", "A").unwrap();
		assert_eq!(op.name, "A");
		assert_eq!(op.kind, ValueKind::Matrix);
		assert_eq!(op.element, ElementType::Float8);
		assert!(op.literal.is_none());
	}

	#[test]
	fn test_tags() {
		let op = Operand::parse("", "n:SCALAR:int").unwrap();
		assert!(op.is_scalar());
		assert_eq!(op.element, ElementType::Int8);
		assert_eq!(op.to_string(), "n:scalar:INT");
	}

	#[test]
	fn test_literal() {
		let op = Operand::parse("", "-2.5").unwrap();
		assert!(op.is_scalar());
		assert_eq!(op.literal, Some(ScalarValue::Float8(-2.5)));
		assert_eq!(op.numeric(&ExecutionContext::default()).unwrap(), -2.5);
	}

	#[test]
	fn test_malformed() {
		for token in [":matrix", "A:vector", "A:matrix:complex", "A:matrix:double:x"] {
			assert!(matches!(Operand::parse("d", token), Err(Error::MalformedInstruction { .. })), "{token}");
		}
	}

	#[test]
	fn test_numeric_from_context() {
		let ctx = ExecutionContext::default();
		ctx.set_scalar("n", 4i64).unwrap();
		ctx.set_scalar("t", "four").unwrap();
		assert_eq!(Operand::parse("", "n:scalar").unwrap().numeric(&ctx).unwrap(), 4.0);
		assert!(matches!(
			Operand::parse("", "t:scalar").unwrap().numeric(&ctx),
			Err(Error::InvalidBlockValue { .. })
		));
		assert!(matches!(
			Operand::parse("", "u:scalar").unwrap().numeric(&ctx),
			Err(Error::UnresolvedVariable { .. })
		));
	}
}
