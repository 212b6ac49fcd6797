// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	f64::consts::{PI, SQRT_2},
	fmt::{self, Display, Formatter},
};

use tabula_type::{Error, Result};

/// Distribution family selected by the `dist` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
	Normal,
	Exponential,
	Uniform,
}

impl DistributionKind {
	pub fn from_name(name: &str) -> Result<Self> {
		match name.to_ascii_lowercase().as_str() {
			"normal" => Ok(DistributionKind::Normal),
			"exp" => Ok(DistributionKind::Exponential),
			"unif" => Ok(DistributionKind::Uniform),
			_ => Err(Error::invalid_parameter("dist", name, "expected one of normal, exp, unif")),
		}
	}
}

impl Display for DistributionKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			DistributionKind::Normal => f.write_str("normal"),
			DistributionKind::Exponential => f.write_str("exp"),
			DistributionKind::Uniform => f.write_str("unif"),
		}
	}
}

/// A fully parameterized distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
	Normal {
		mean: f64,
		sd: f64,
	},
	Exponential {
		rate: f64,
	},
	Uniform {
		min: f64,
		max: f64,
	},
}

impl Distribution {
	pub fn normal(mean: f64, sd: f64) -> Result<Self> {
		if !(sd > 0.0) || !mean.is_finite() {
			return Err(Error::invalid_parameter("sd", sd.to_string(), "standard deviation must be positive"));
		}
		Ok(Distribution::Normal {
			mean,
			sd,
		})
	}

	pub fn exponential(rate: f64) -> Result<Self> {
		if !(rate > 0.0) {
			return Err(Error::invalid_parameter("rate", rate.to_string(), "rate must be positive"));
		}
		Ok(Distribution::Exponential {
			rate,
		})
	}

	pub fn uniform(min: f64, max: f64) -> Result<Self> {
		if !(min < max) {
			return Err(Error::invalid_parameter("max", max.to_string(), format!("must be greater than min {min}")));
		}
		Ok(Distribution::Uniform {
			min,
			max,
		})
	}

	pub fn kind(&self) -> DistributionKind {
		match self {
			Distribution::Normal {
				..
			} => DistributionKind::Normal,
			Distribution::Exponential {
				..
			} => DistributionKind::Exponential,
			Distribution::Uniform {
				..
			} => DistributionKind::Uniform,
		}
	}

	/// P(X <= x), or P(X > x) when `lower_tail` is false.
	pub fn cdf(&self, x: f64, lower_tail: bool) -> f64 {
		let p = match *self {
			Distribution::Normal {
				mean,
				sd,
			} => standard_normal_cdf((x - mean) / sd),
			Distribution::Exponential {
				rate,
			} => {
				if x <= 0.0 {
					0.0
				} else {
					-libm::expm1(-rate * x)
				}
			}
			Distribution::Uniform {
				min,
				max,
			} => ((x - min) / (max - min)).clamp(0.0, 1.0),
		};
		if lower_tail { p } else { 1.0 - p }
	}

	/// Smallest x with P(X <= x) >= p. Probabilities outside [0, 1] yield NaN.
	pub fn inverse_cdf(&self, p: f64) -> f64 {
		if !(0.0..=1.0).contains(&p) {
			return f64::NAN;
		}
		match *self {
			Distribution::Normal {
				mean,
				sd,
			} => mean + sd * standard_normal_quantile(p),
			Distribution::Exponential {
				rate,
			} => -libm::log1p(-p) / rate,
			Distribution::Uniform {
				min,
				max,
			} => min + p * (max - min),
		}
	}
}

fn standard_normal_cdf(z: f64) -> f64 {
	0.5 * libm::erfc(-z / SQRT_2)
}

// Acklam's rational approximation followed by one Halley step.
const A: [f64; 6] = [
	-3.969683028665376e+01,
	2.209460984245205e+02,
	-2.759285104469687e+02,
	1.383577518672690e+02,
	-3.066479806614716e+01,
	2.506628277459239e+00,
];
const B: [f64; 5] = [
	-5.447609879822406e+01,
	1.615858368580409e+02,
	-1.556989798598866e+02,
	6.680131188771972e+01,
	-1.328068155288572e+01,
];
const C: [f64; 6] = [
	-7.784894002430293e-03,
	-3.223964580411365e-01,
	-2.400758277161838e+00,
	-2.549671010739305e+00,
	4.374664141464968e+00,
	2.938163982698783e+00,
];
const D: [f64; 4] = [7.784695709041462e-03, 3.224671290700398e-01, 2.445134137142996e+00, 3.754408661907416e+00];
const P_LOW: f64 = 0.02425;

fn standard_normal_quantile(p: f64) -> f64 {
	if p == 0.0 {
		return f64::NEG_INFINITY;
	}
	if p == 1.0 {
		return f64::INFINITY;
	}

	let tail = |q: f64| {
		(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
			/ ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
	};

	let x = if p < P_LOW {
		tail((-2.0 * p.ln()).sqrt())
	} else if p <= 1.0 - P_LOW {
		let q = p - 0.5;
		let r = q * q;
		(((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
			/ (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
	} else {
		-tail((-2.0 * (1.0 - p).ln()).sqrt())
	};

	let e = standard_normal_cdf(x) - p;
	let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
	x - u / (1.0 + x * u / 2.0)
}
