// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};

use tabula_operator::{BinaryFn, UnaryFn};
use tabula_type::Error;

/// Every opcode a descriptor may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
	Binary(BinaryFn),
	Unary(UnaryFn),
	Cdf,
	InvCdf,
	GroupedAggregate,
	RemoveEmpty,
	Replace,
	Rexpand,
	Transform,
	TransformApply,
	TransformDecode,
	TransformMeta,
	ToString,
	RemoveVariable,
}

impl Opcode {
	pub fn name(&self) -> &'static str {
		match self {
			Opcode::Binary(function) => function.symbol(),
			Opcode::Unary(function) => function.name(),
			Opcode::Cdf => "cdf",
			Opcode::InvCdf => "invcdf",
			Opcode::GroupedAggregate => "groupedagg",
			Opcode::RemoveEmpty => "rmempty",
			Opcode::Replace => "replace",
			Opcode::Rexpand => "rexpand",
			Opcode::Transform => "transform",
			Opcode::TransformApply => "transformapply",
			Opcode::TransformDecode => "transformdecode",
			Opcode::TransformMeta => "transformmeta",
			Opcode::ToString => "tostring",
			Opcode::RemoveVariable => "rmvar",
		}
	}

	/// Whether interior tokens are `key=value` parameters rather than operands.
	pub fn is_parameterized(&self) -> bool {
		!matches!(self, Opcode::Binary(_) | Opcode::Unary(_) | Opcode::RemoveVariable)
	}
}

impl FromStr for Opcode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let opcode = match s.to_ascii_lowercase().as_str() {
			"cdf" => Opcode::Cdf,
			"invcdf" => Opcode::InvCdf,
			"groupedagg" => Opcode::GroupedAggregate,
			"rmempty" => Opcode::RemoveEmpty,
			"replace" => Opcode::Replace,
			"rexpand" => Opcode::Rexpand,
			"transform" => Opcode::Transform,
			"transformapply" => Opcode::TransformApply,
			"transformdecode" => Opcode::TransformDecode,
			"transformmeta" => Opcode::TransformMeta,
			"tostring" => Opcode::ToString,
			"rmvar" => Opcode::RemoveVariable,
			other => {
				if let Some(function) = BinaryFn::from_opcode(other) {
					Opcode::Binary(function)
				} else if let Some(function) = UnaryFn::from_opcode(other) {
					Opcode::Unary(function)
				} else {
					return Err(Error::UnknownOpcode {
						opcode: s.to_string(),
					});
				}
			}
		};
		Ok(opcode)
	}
}

impl Display for Opcode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
