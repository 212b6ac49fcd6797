// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_operator::UnaryOperator;
use tabula_type::{Result, ScalarValue};

use super::{descriptor::Descriptor, operand::Operand};
use crate::ExecutionContext;

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryInstruction {
	pub operator: UnaryOperator,
	pub input: Operand,
	pub output: String,
}

impl UnaryInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>, operator: UnaryOperator) -> Result<Self> {
		let [input] = descriptor.typed_operands::<1>()?;
		Ok(Self {
			operator,
			input,
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		if self.input.is_scalar() {
			let value = self.operator.apply_scalar(self.input.numeric(ctx)?);
			return ctx.set_scalar(&self.output, ScalarValue::Float8(value));
		}

		let result = {
			let input = ctx.pin_matrix(&self.input.name)?;
			self.operator.apply(&input)
		};
		ctx.set_matrix_output(&self.output, result)
	}
}
