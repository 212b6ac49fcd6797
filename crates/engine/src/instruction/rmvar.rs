// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_type::Result;

use super::descriptor::Descriptor;
use crate::ExecutionContext;

/// `rmvar`: unbinds variables, destroying their objects once unpinned.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveVariableInstruction {
	pub names: Vec<String>,
}

impl RemoveVariableInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let names = descriptor
			.operands
			.iter()
			.copied()
			.chain(std::iter::once(descriptor.output))
			.map(|token| token.split(':').next().unwrap_or(token).to_string())
			.collect();
		Ok(Self {
			names,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		for name in &self.names {
			ctx.remove_variable(name)?;
		}
		Ok(())
	}
}
