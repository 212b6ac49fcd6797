// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Secondary storage for evicted blocks.

pub mod codec;
mod file;
mod memory;

use std::fmt::{self, Display, Formatter};

pub use file::FileSpillBackend;
pub use memory::MemorySpillBackend;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SpillError {
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("codec error: {0}")]
	Codec(#[from] postcard::Error),

	#[error("spill entry '{0}' not found")]
	NotFound(SpillKey),

	#[error("corrupt spill entry: {0}")]
	Corrupt(String),
}

/// Unique name of one spilled block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpillKey(String);

impl SpillKey {
	pub fn new(object: &str) -> Self {
		let stem: String = object
			.chars()
			.map(|c| {
				if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
					c
				} else {
					'_'
				}
			})
			.collect();
		Self(format!("{}-{}", stem, Uuid::new_v4().simple()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for SpillKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Descriptor of an evicted block's serialized form.
#[derive(Debug, Clone)]
pub struct SpilledBlock {
	pub key: SpillKey,
	/// Serialized size on secondary storage.
	pub bytes: usize,
	/// Size the block occupies once restored.
	pub resident_size: usize,
	pub compressed: bool,
}

/// Trait for spill storage backends
pub trait SpillBackend: Send + Sync {
	fn write(&self, key: &SpillKey, bytes: &[u8]) -> Result<(), SpillError>;

	fn read(&self, key: &SpillKey) -> Result<Vec<u8>, SpillError>;

	fn remove(&self, key: &SpillKey) -> Result<(), SpillError>;

	fn name(&self) -> &str;
}
