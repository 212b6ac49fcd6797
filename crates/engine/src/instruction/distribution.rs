// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_operator::{Distribution, DistributionKind, SimpleFn, SimpleOperator};
use tabula_type::{Error, Result, ScalarValue};

use super::{
	descriptor::{Descriptor, Parameters},
	param::Param,
};
use crate::ExecutionContext;

/// `cdf` and `invcdf`: evaluates a distribution function at a scalar `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionInstruction {
	pub operator: SimpleOperator,
	pub target: Param<f64>,
	pub mean: Param<f64>,
	pub sd: Param<f64>,
	pub rate: Param<f64>,
	pub min: Param<f64>,
	pub max: Param<f64>,
	pub lower_tail: Param<bool>,
	pub output: String,
}

impl DistributionInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>, inverse: bool) -> Result<Self> {
		let params: Parameters = descriptor.parameters()?;
		let target = params.param("target")?;
		let kind = DistributionKind::from_name(params.required("dist")?)?;
		let function = if inverse {
			SimpleFn::InvCdf(kind)
		} else {
			SimpleFn::Cdf(kind)
		};

		Ok(Self {
			operator: SimpleOperator::new(function),
			target,
			mean: params.param_or("mean", "0"),
			sd: params.param_or("sd", "1"),
			rate: params.param_or("rate", "1"),
			min: params.param_or("min", "0"),
			max: params.param_or("max", "1"),
			lower_tail: params.param_or("lower.tail", "true"),
			output: descriptor.output_name()?,
		})
	}

	fn distribution(&self, kind: DistributionKind) -> Result<Distribution> {
		match kind {
			DistributionKind::Normal => Distribution::normal(self.mean.get()?, self.sd.get()?),
			DistributionKind::Exponential => Distribution::exponential(self.rate.get()?),
			DistributionKind::Uniform => Distribution::uniform(self.min.get()?, self.max.get()?),
		}
	}

	/// A numeric literal, or else the name of a numeric scalar variable.
	fn resolve_target(&self, ctx: &ExecutionContext) -> Result<f64> {
		match self.target.get() {
			Ok(value) => Ok(value),
			Err(e) => match ctx.scalar(self.target.raw()) {
				Ok(scalar) => scalar.as_f64().ok_or(e),
				Err(_) => Err(e),
			},
		}
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let kind = self.operator.distribution_kind().ok_or_else(|| Error::invalid_block("operator has no distribution"))?;
		let distribution = self.distribution(kind)?;
		let value = self.operator.evaluate(self.resolve_target(ctx)?, &distribution, self.lower_tail.get()?)?;
		ctx.set_scalar(&self.output, ScalarValue::Float8(value))
	}
}
