// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_builtin::replace;
use tabula_type::Result;

use super::{descriptor::Descriptor, param::Param};
use crate::ExecutionContext;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceInstruction {
	pub target: String,
	pub pattern: Param<f64>,
	pub replacement: Param<f64>,
	pub output: String,
}

impl ReplaceInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			pattern: params.param("pattern")?,
			replacement: params.param("replacement")?,
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let pattern = self.pattern.get()?;
		let replacement = self.replacement.get()?;
		let result = {
			let target = ctx.pin_matrix(&self.target)?;
			replace(&target, pattern, replacement)
		};
		ctx.set_matrix_output(&self.output, result)
	}
}
