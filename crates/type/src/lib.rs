// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod block;
pub mod error;
pub mod value;

pub use block::{Block, FrameBlock, FrameColumn, FrameData, MatrixBlock};
pub use error::{Error, ErrorKind, Result, Shape};
pub use value::{CacheableKind, ElementType, ScalarValue, ValueKind};
