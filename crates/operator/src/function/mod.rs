// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod aggregate;
pub mod binary;
pub mod distribution;
pub mod unary;
