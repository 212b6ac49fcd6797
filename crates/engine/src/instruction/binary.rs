// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_operator::BinaryOperator;
use tabula_type::{Result, ScalarValue};

use super::{descriptor::Descriptor, operand::Operand};
use crate::ExecutionContext;

/// Element-wise arithmetic, comparison or logic between two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryInstruction {
	pub operator: BinaryOperator,
	pub left: Operand,
	pub right: Operand,
	pub output: String,
}

impl BinaryInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>, operator: BinaryOperator) -> Result<Self> {
		let [left, right] = descriptor.typed_operands::<2>()?;
		Ok(Self {
			operator,
			left,
			right,
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		match (self.left.is_scalar(), self.right.is_scalar()) {
			(true, true) => {
				let value = self.operator.apply_scalars(self.left.numeric(ctx)?, self.right.numeric(ctx)?);
				ctx.set_scalar(&self.output, ScalarValue::Float8(value))
			}
			(false, true) => {
				let scalar = self.right.numeric(ctx)?;
				let result = {
					let matrix = ctx.pin_matrix(&self.left.name)?;
					self.operator.apply_scalar(&matrix, scalar, false)
				};
				ctx.set_matrix_output(&self.output, result)
			}
			(true, false) => {
				let scalar = self.left.numeric(ctx)?;
				let result = {
					let matrix = ctx.pin_matrix(&self.right.name)?;
					self.operator.apply_scalar(&matrix, scalar, true)
				};
				ctx.set_matrix_output(&self.output, result)
			}
			(false, false) => {
				let result = {
					let left = ctx.pin_matrix(&self.left.name)?;
					let right = ctx.pin_matrix(&self.right.name)?;
					self.operator.apply(&left, &right)?
				};
				ctx.set_matrix_output(&self.output, result)
			}
		}
	}
}
