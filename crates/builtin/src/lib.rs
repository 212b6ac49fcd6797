// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Reference kernels for the parameterized builtin instructions.
//!
//! Every kernel is a plain function over in-memory blocks; pinning and
//! publishing are the caller's business.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod grouped;
pub mod remove_empty;
pub mod replace;
pub mod rexpand;
pub mod stringify;
pub mod transform;

pub use grouped::{GroupedAggregate, grouped_aggregate, output_groups};
pub use remove_empty::{Margin, remove_empty};
pub use replace::replace;
pub use rexpand::{Direction, Rexpand, rexpand};
pub use stringify::{StringifyOptions, frame_to_string, matrix_to_string};
