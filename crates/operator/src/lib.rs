// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod function;
mod operator;

pub use function::{
	aggregate::{AggregateFn, Moments},
	binary::BinaryFn,
	distribution::{Distribution, DistributionKind},
	unary::UnaryFn,
};
pub use operator::{BinaryOperator, Operator, SimpleFn, SimpleOperator, UnaryOperator};
