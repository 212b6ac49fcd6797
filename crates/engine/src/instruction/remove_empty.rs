// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_builtin::{Margin, remove_empty};
use tabula_type::Result;

use super::descriptor::Descriptor;
use crate::ExecutionContext;

/// `rmempty`: drops empty rows or columns, optionally driven by a `select` vector.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveEmptyInstruction {
	pub target: String,
	pub margin: Margin,
	pub select: Option<String>,
	pub output: String,
}

impl RemoveEmptyInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			margin: Margin::from_name(params.required("margin")?)?,
			select: params.optional("select").map(str::to_string),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let result = {
			let target = ctx.pin_matrix(&self.target)?;
			let select = self.select.as_deref().map(|name| ctx.pin_matrix(name)).transpose()?;
			remove_empty(&target, self.margin, select.as_deref())?
		};
		ctx.set_matrix_output(&self.output, result)
	}
}
