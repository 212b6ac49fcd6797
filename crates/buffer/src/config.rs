// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

/// Where evicted blocks go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpillConfig {
	Memory,
	Directory(PathBuf),
}

/// Configuration for the buffer pool.
#[derive(Debug, Clone)]
pub struct BufferPoolConfig {
	/// Upper bound on the aggregate size of resident blocks, in bytes.
	pub memory_budget: usize,
	pub spill: SpillConfig,
	/// zstd level applied to spilled blocks; `None` stores them raw.
	pub compression_level: Option<i32>,
}

impl Default for BufferPoolConfig {
	fn default() -> Self {
		Self {
			memory_budget: 1 << 30,
			spill: SpillConfig::Memory,
			compression_level: None,
		}
	}
}

impl BufferPoolConfig {
	pub fn with_memory_budget(mut self, bytes: usize) -> Self {
		self.memory_budget = bytes;
		self
	}

	pub fn with_spill_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.spill = SpillConfig::Directory(dir.into());
		self
	}

	pub fn with_compression(mut self, level: i32) -> Self {
		self.compression_level = Some(level);
		self
	}
}
