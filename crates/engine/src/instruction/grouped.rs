// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_builtin::{GroupedAggregate, grouped_aggregate, output_groups};
use tabula_operator::AggregateFn;
use tabula_type::Result;

use super::{descriptor::Descriptor, param::Param};
use crate::ExecutionContext;

/// `groupedagg`: per-group aggregation of `target` by the ids in `groups`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedAggregateInstruction {
	pub function: AggregateFn,
	pub target: String,
	pub groups: String,
	pub weights: Option<String>,
	pub ngroups: Option<Param<usize>>,
	pub k: Param<usize>,
	pub output: String,
}

impl GroupedAggregateInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		let target = params.required("target")?.to_string();
		let groups = params.required("groups")?.to_string();
		let name = params.required("fn")?;
		let order = if AggregateFn::requires_order(name) {
			Some(params.required("order")?)
		} else {
			None
		};
		let function = AggregateFn::from_name(name, order)?;

		Ok(Self {
			function,
			target,
			groups,
			weights: params.optional("weights").map(str::to_string),
			ngroups: params.optional("ngroups").map(|raw| Param::new("ngroups", raw)),
			k: params.param_or("k", "1"),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let config = GroupedAggregate {
			function: self.function,
			ngroups: self.ngroups.as_ref().map(Param::get).transpose()?,
			parallelism: self.k.get()?.clamp(1, ctx.max_parallelism()),
		};

		let result = {
			let target = ctx.pin_matrix(&self.target)?;
			let groups = ctx.pin_matrix(&self.groups)?;
			ctx.reserve_matrix(&self.output, output_groups(&groups, config.ngroups)?, target.cols())?;
			let weights = self.weights.as_deref().map(|name| ctx.pin_matrix(name)).transpose()?;
			grouped_aggregate(&target, &groups, weights.as_deref(), &config)?
		};
		ctx.set_matrix_output(&self.output, result)
	}
}
