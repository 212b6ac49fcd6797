// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_builtin::{Direction, Rexpand, rexpand};
use tabula_type::{Error, Result};

use super::{descriptor::Descriptor, param::Param};
use crate::ExecutionContext;

/// `rexpand`: expands a category vector into an indicator matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RexpandInstruction {
	pub target: String,
	pub max: Param<f64>,
	pub direction: Direction,
	pub cast: Param<bool>,
	pub ignore: Param<bool>,
	pub output: String,
}

impl RexpandInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			max: params.param("max")?,
			direction: Direction::from_name(params.required("dir")?)?,
			cast: params.param_or("cast", "true"),
			ignore: params.param_or("ignore", "true"),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let max = self.max.get()?;
		if !(max >= 0.0 && max.is_finite()) {
			return Err(Error::invalid_parameter(self.max.key(), self.max.raw(), "expected a non-negative number"));
		}
		let config = Rexpand {
			max: max as usize,
			direction: self.direction,
			cast: self.cast.get()?,
			ignore: self.ignore.get()?,
		};

		let result = {
			let target = ctx.pin_matrix(&self.target)?;
			let (rows, cols) = config.output_shape(target.values().len());
			ctx.reserve_matrix(&self.output, rows, cols)?;
			rexpand(&target, &config)?
		};
		ctx.set_matrix_output(&self.output, result)
	}
}
