// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tabula_type::{Error, MatrixBlock, Result};

use crate::{AggregateFn, BinaryFn, Distribution, DistributionKind, UnaryFn};

/// The computation an instruction is bound to at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
	Unary(UnaryOperator),
	Binary(BinaryOperator),
	Simple(SimpleOperator),
}

impl Display for Operator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Operator::Unary(op) => Display::fmt(&op.function, f),
			Operator::Binary(op) => Display::fmt(&op.function, f),
			Operator::Simple(op) => Display::fmt(&op.function, f),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryOperator {
	pub function: UnaryFn,
}

impl UnaryOperator {
	pub fn new(function: UnaryFn) -> Self {
		Self {
			function,
		}
	}

	pub fn apply(&self, input: &MatrixBlock) -> MatrixBlock {
		input.map(|v| self.function.apply(v))
	}

	pub fn apply_scalar(&self, value: f64) -> f64 {
		self.function.apply(value)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperator {
	pub function: BinaryFn,
}

impl BinaryOperator {
	pub fn new(function: BinaryFn) -> Self {
		Self {
			function,
		}
	}

	/// Element-wise application with broadcasting of 1x1 matrices, row vectors and column vectors.
	pub fn apply(&self, left: &MatrixBlock, right: &MatrixBlock) -> Result<MatrixBlock> {
		let (rows, cols) = broadcast_shape(left, right).ok_or_else(|| Error::shape_mismatch(left.shape(), right.shape()))?;

		if left.shape() == right.shape() {
			let values = left.values().iter().zip(right.values()).map(|(&l, &r)| self.function.apply(l, r)).collect();
			return MatrixBlock::from_vec(rows, cols, values);
		}

		MatrixBlock::from_fn(rows, cols, |r, c| self.function.apply(broadcast_get(left, r, c), broadcast_get(right, r, c)))
	}

	/// Applies the function between every cell and `scalar`, with the scalar as left operand when `scalar_on_left`.
	pub fn apply_scalar(&self, matrix: &MatrixBlock, scalar: f64, scalar_on_left: bool) -> MatrixBlock {
		if scalar_on_left {
			matrix.map(|v| self.function.apply(scalar, v))
		} else {
			matrix.map(|v| self.function.apply(v, scalar))
		}
	}

	pub fn apply_scalars(&self, left: f64, right: f64) -> f64 {
		self.function.apply(left, right)
	}
}

fn broadcast_shape(left: &MatrixBlock, right: &MatrixBlock) -> Option<(usize, usize)> {
	if left.shape() == right.shape() || right.is_scalar_equivalent() {
		return Some(left.shape());
	}
	if left.is_scalar_equivalent() {
		return Some(right.shape());
	}
	if left.cols() == right.cols() && (left.rows() == 1 || right.rows() == 1) {
		let rows = if left.rows() == 1 { right.rows() } else { left.rows() };
		return Some((rows, left.cols()));
	}
	if left.rows() == right.rows() && (left.cols() == 1 || right.cols() == 1) {
		let cols = if left.cols() == 1 { right.cols() } else { left.cols() };
		return Some((left.rows(), cols));
	}
	None
}

#[inline]
fn broadcast_get(matrix: &MatrixBlock, row: usize, col: usize) -> f64 {
	let row = if matrix.rows() == 1 { 0 } else { row };
	let col = if matrix.cols() == 1 { 0 } else { col };
	matrix.get(row, col)
}

/// Functions whose behaviour is driven by instruction parameters rather than operand arity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimpleFn {
	Cdf(DistributionKind),
	InvCdf(DistributionKind),
	GroupedAggregate(AggregateFn),
	RemoveEmpty,
	Replace,
	Rexpand,
}

impl Display for SimpleFn {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			SimpleFn::Cdf(kind) => write!(f, "cdf({kind})"),
			SimpleFn::InvCdf(kind) => write!(f, "invcdf({kind})"),
			SimpleFn::GroupedAggregate(function) => write!(f, "groupedagg({function})"),
			SimpleFn::RemoveEmpty => f.write_str("rmempty"),
			SimpleFn::Replace => f.write_str("replace"),
			SimpleFn::Rexpand => f.write_str("rexpand"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleOperator {
	pub function: SimpleFn,
}

impl SimpleOperator {
	pub fn new(function: SimpleFn) -> Self {
		Self {
			function,
		}
	}

	pub fn distribution_kind(&self) -> Option<DistributionKind> {
		match self.function {
			SimpleFn::Cdf(kind) | SimpleFn::InvCdf(kind) => Some(kind),
			_ => None,
		}
	}

	/// Evaluates a distribution function at `target`. `lower_tail` only affects the CDF.
	pub fn evaluate(&self, target: f64, distribution: &Distribution, lower_tail: bool) -> Result<f64> {
		if self.distribution_kind() != Some(distribution.kind()) {
			return Err(Error::invalid_parameter(
				"dist",
				distribution.kind().to_string(),
				format!("operator {} cannot evaluate it", self.function),
			));
		}
		match self.function {
			SimpleFn::Cdf(_) => Ok(distribution.cdf(target, lower_tail)),
			_ => Ok(distribution.inverse_cdf(target)),
		}
	}
}
