// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tabula_type::{Error, Result};

/// Per-group aggregation selected by the `fn` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFn {
	Sum,
	Count,
	Mean,
	Variance,
	/// Population central moment of the given order, 2 to 4.
	CentralMoment(u8),
	Min,
	Max,
}

impl AggregateFn {
	/// Whether `name` needs an `order` to be resolved.
	pub fn requires_order(name: &str) -> bool {
		name.eq_ignore_ascii_case("centralmoment")
	}

	pub fn from_name(name: &str, order: Option<&str>) -> Result<Self> {
		match name.to_ascii_lowercase().as_str() {
			"sum" => Ok(AggregateFn::Sum),
			"count" => Ok(AggregateFn::Count),
			"mean" => Ok(AggregateFn::Mean),
			"variance" => Ok(AggregateFn::Variance),
			"min" => Ok(AggregateFn::Min),
			"max" => Ok(AggregateFn::Max),
			"centralmoment" => {
				let raw = order.unwrap_or_default();
				match raw.trim().parse::<u8>() {
					Ok(order @ 2..=4) => Ok(AggregateFn::CentralMoment(order)),
					_ => Err(Error::invalid_parameter("order", raw, "central moment order must be 2, 3 or 4")),
				}
			}
			_ => Err(Error::invalid_parameter(
				"fn",
				name,
				"expected one of sum, count, mean, variance, centralmoment, min, max",
			)),
		}
	}
}

impl Display for AggregateFn {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			AggregateFn::Sum => f.write_str("sum"),
			AggregateFn::Count => f.write_str("count"),
			AggregateFn::Mean => f.write_str("mean"),
			AggregateFn::Variance => f.write_str("variance"),
			AggregateFn::CentralMoment(order) => write!(f, "centralmoment({order})"),
			AggregateFn::Min => f.write_str("min"),
			AggregateFn::Max => f.write_str("max"),
		}
	}
}

/// Weighted power sums of one group, mergeable across partitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
	weight: f64,
	sums: [f64; 4],
	min: f64,
	max: f64,
}

impl Default for Moments {
	fn default() -> Self {
		Self {
			weight: 0.0,
			sums: [0.0; 4],
			min: f64::INFINITY,
			max: f64::NEG_INFINITY,
		}
	}
}

impl Moments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn weight(&self) -> f64 {
		self.weight
	}

	#[inline]
	pub fn add(&mut self, value: f64, weight: f64) {
		self.weight += weight;
		let mut power = weight;
		for sum in self.sums.iter_mut() {
			power *= value;
			*sum += power;
		}
		self.min = self.min.min(value);
		self.max = self.max.max(value);
	}

	pub fn merge(&mut self, other: &Moments) {
		self.weight += other.weight;
		for (sum, o) in self.sums.iter_mut().zip(other.sums) {
			*sum += o;
		}
		self.min = self.min.min(other.min);
		self.max = self.max.max(other.max);
	}

	/// Result of `function` over the accumulated values. Empty groups yield 0 for sum and count, NaN otherwise.
	pub fn finish(&self, function: AggregateFn) -> f64 {
		let w = self.weight;
		if w == 0.0 {
			return match function {
				AggregateFn::Sum | AggregateFn::Count => 0.0,
				_ => f64::NAN,
			};
		}

		let mean = self.sums[0] / w;
		let raw = |k: usize| self.sums[k - 1] / w;
		match function {
			AggregateFn::Sum => self.sums[0],
			AggregateFn::Count => w,
			AggregateFn::Mean => mean,
			AggregateFn::Variance => {
				if w <= 1.0 {
					0.0
				} else {
					let m2 = (raw(2) - mean * mean).max(0.0);
					m2 * w / (w - 1.0)
				}
			}
			AggregateFn::CentralMoment(2) => (raw(2) - mean * mean).max(0.0),
			AggregateFn::CentralMoment(3) => raw(3) - 3.0 * mean * raw(2) + 2.0 * mean.powi(3),
			AggregateFn::CentralMoment(_) => {
				raw(4) - 4.0 * mean * raw(3) + 6.0 * mean * mean * raw(2) - 3.0 * mean.powi(4)
			}
			AggregateFn::Min => self.min,
			AggregateFn::Max => self.max,
		}
	}
}
