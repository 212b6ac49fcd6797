// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dashmap::DashMap;

use super::{SpillBackend, SpillError, SpillKey};

/// Keeps spilled bytes on the heap. Useful for tests and small deployments.
#[derive(Clone, Default)]
pub struct MemorySpillBackend {
	entries: Arc<DashMap<SpillKey, Vec<u8>>>,
}

impl MemorySpillBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl SpillBackend for MemorySpillBackend {
	fn write(&self, key: &SpillKey, bytes: &[u8]) -> Result<(), SpillError> {
		self.entries.insert(key.clone(), bytes.to_vec());
		Ok(())
	}

	fn read(&self, key: &SpillKey) -> Result<Vec<u8>, SpillError> {
		self.entries.get(key).map(|e| e.value().clone()).ok_or_else(|| SpillError::NotFound(key.clone()))
	}

	fn remove(&self, key: &SpillKey) -> Result<(), SpillError> {
		self.entries.remove(key);
		Ok(())
	}

	fn name(&self) -> &str {
		"memory"
	}
}
