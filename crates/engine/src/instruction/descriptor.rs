// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use tabula_type::{Error, Result};

use super::{operand::Operand, param::Param};

/// Separates descriptor tokens when present; otherwise tokens split on whitespace.
pub const OPERAND_DELIM: char = '\u{00b0}';

/// A descriptor split into opcode, interior tokens and output token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor<'a> {
	pub text: &'a str,
	pub opcode: &'a str,
	pub operands: Vec<&'a str>,
	pub output: &'a str,
}

impl<'a> Descriptor<'a> {
	pub fn tokenize(text: &'a str) -> Result<Self> {
		let tokens: Vec<&str> = if text.contains(OPERAND_DELIM) {
			text.trim().split(OPERAND_DELIM).collect()
		} else {
			text.split_ascii_whitespace().collect()
		};

		if tokens.len() < 2 {
			return Err(Error::malformed(text, "expected at least an opcode and an output operand"));
		}
		let (opcode, rest) = tokens.split_first().ok_or_else(|| Error::malformed(text, "empty descriptor"))?;
		let (output, operands) = rest.split_last().ok_or_else(|| Error::malformed(text, "missing output operand"))?;

		Ok(Self {
			text,
			opcode: *opcode,
			operands: operands.to_vec(),
			output: *output,
		})
	}

	/// Interior tokens as exactly `N` typed operand references.
	pub fn typed_operands<const N: usize>(&self) -> Result<[Operand; N]> {
		let arity_error = || {
			Error::malformed(
				self.text,
				format!("'{}' expects {N} input operand(s), got {}", self.opcode, self.operands.len()),
			)
		};
		if self.operands.len() != N {
			return Err(arity_error());
		}
		let operands = self.operands.iter().map(|token| Operand::parse(self.text, token)).collect::<Result<Vec<_>>>()?;
		operands.try_into().map_err(|_| arity_error())
	}

	/// Interior tokens as `key=value` parameters.
	pub fn parameters(&self) -> Result<Parameters> {
		let mut values = HashMap::with_capacity(self.operands.len());
		for token in &self.operands {
			let (key, value) = token
				.split_once('=')
				.ok_or_else(|| Error::malformed(self.text, format!("parameter '{token}' is not key=value")))?;
			values.insert(key.to_string(), value.to_string());
		}
		Ok(Parameters {
			opcode: self.opcode.to_ascii_lowercase(),
			values,
		})
	}

	/// Name of the output variable, from `out=NAME` or an operand reference.
	pub fn output_name(&self) -> Result<String> {
		match self.output.split_once('=') {
			Some(("out", name)) if !name.is_empty() => Ok(name.to_string()),
			Some(_) => Err(Error::malformed(self.text, format!("invalid output token '{}'", self.output))),
			None => Ok(Operand::parse(self.text, self.output)?.name),
		}
	}
}

/// Parameter map of one parameterized builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
	opcode: String,
	values: HashMap<String, String>,
}

impl Parameters {
	pub fn required(&self, key: &str) -> Result<&str> {
		self.optional(key).ok_or_else(|| Error::missing_parameter(&self.opcode, key))
	}

	pub fn optional(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// A lazily parsed mandatory parameter.
	pub fn param<T>(&self, key: &str) -> Result<Param<T>> {
		Ok(Param::new(key, self.required(key)?))
	}

	/// A lazily parsed optional parameter falling back to `default`.
	pub fn param_or<T>(&self, key: &str, default: &str) -> Param<T> {
		Param::new(key, self.optional(key).unwrap_or(default))
	}
}
