// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{mem::size_of, ops::Range};

use rayon::{ThreadPoolBuilder, prelude::*};
use tabula_operator::{AggregateFn, Moments};
use tabula_type::{Error, MatrixBlock, Result};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedAggregate {
	pub function: AggregateFn,
	/// Number of output groups; ids above it are ignored. Defaults to the largest id.
	pub ngroups: Option<usize>,
	/// Worker threads used to accumulate partitions of the rows.
	pub parallelism: usize,
}

/// Aggregates each column of `target` per group id, producing one row per id in ascending order.
#[instrument(name = "builtin::grouped::aggregate", level = "debug", skip_all, fields(function = %config.function, k = config.parallelism))]
pub fn grouped_aggregate(
	target: &MatrixBlock,
	groups: &MatrixBlock,
	weights: Option<&MatrixBlock>,
	config: &GroupedAggregate,
) -> Result<MatrixBlock> {
	let rows = target.rows();
	let cols = target.cols();

	aligned(target, groups)?;
	if let Some(weights) = weights {
		aligned(target, weights)?;
	}

	let ids = group_ids(groups)?;
	let ngroups = config.ngroups.unwrap_or_else(|| ids.iter().copied().max().unwrap_or(0));
	let cells = accumulators(ngroups, cols)?;

	let accumulate = |range: Range<usize>| {
		let mut partial = vec![Moments::new(); cells];
		for row in range {
			let id = ids[row];
			if id > ngroups {
				continue;
			}
			let weight = weights.map_or(1.0, |w| w.values()[row]);
			let slot = &mut partial[(id - 1) * cols..id * cols];
			for (moments, &value) in slot.iter_mut().zip(target.row(row)) {
				moments.add(value, weight);
			}
		}
		partial
	};

	let k = config.parallelism.clamp(1, rows.max(1));
	let merged = if k == 1 {
		accumulate(0..rows)
	} else {
		let pool = ThreadPoolBuilder::new()
			.num_threads(k)
			.thread_name(|i| format!("groupedagg-{i}"))
			.build()
			.map_err(|e| Error::invalid_parameter("k", k.to_string(), e.to_string()))?;

		let chunk = rows.div_ceil(k);
		pool.install(|| {
			(0..k)
				.into_par_iter()
				.map(|part| accumulate(part * chunk..((part + 1) * chunk).min(rows)))
				.reduce(
					|| vec![Moments::new(); cells],
					|mut left, right| {
						for (l, r) in left.iter_mut().zip(&right) {
							l.merge(r);
						}
						left
					},
				)
		})
	};

	debug!(rows, ngroups, k, "grouped aggregate");
	MatrixBlock::from_vec(ngroups, cols, merged.iter().map(|m| m.finish(config.function)).collect())
}

/// Number of output rows: `ngroups` when given, otherwise the largest id in `groups`.
pub fn output_groups(groups: &MatrixBlock, ngroups: Option<usize>) -> Result<usize> {
	match ngroups {
		Some(ngroups) => Ok(ngroups),
		None => Ok(group_ids(groups)?.into_iter().max().unwrap_or(0)),
	}
}

fn accumulators(ngroups: usize, cols: usize) -> Result<usize> {
	ngroups.checked_mul(cols)
		.filter(|cells| cells.checked_mul(size_of::<Moments>()).is_some_and(|bytes| bytes <= isize::MAX as usize))
		.ok_or_else(|| Error::invalid_block(format!("{ngroups} groups of {cols} columns do not fit in memory")))
}

fn aligned(target: &MatrixBlock, vector: &MatrixBlock) -> Result<()> {
	if vector.cols() != 1 || vector.rows() != target.rows() {
		return Err(Error::shape_mismatch(target.shape(), vector.shape()));
	}
	Ok(())
}

fn group_ids(groups: &MatrixBlock) -> Result<Vec<usize>> {
	groups.values()
		.iter()
		.enumerate()
		.map(|(row, &id)| {
			if id >= 1.0 && id.fract() == 0.0 && id.is_finite() {
				Ok(id as usize)
			} else {
				Err(Error::invalid_block(format!("group id {id} at row {} is not a positive integer", row + 1)))
			}
		})
		.collect()
}
