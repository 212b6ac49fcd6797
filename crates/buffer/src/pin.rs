// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use tabula_type::{Block, Result};
use tracing::{debug, error};

use crate::{BufferPool, object::CacheableObject};

/// Shared pin on one object. The block cannot be evicted or replaced while it lives.
pub struct ReadPin<'a> {
	pool: &'a BufferPool,
	object: Option<Arc<CacheableObject>>,
	block: Arc<Block>,
}

impl<'a> ReadPin<'a> {
	pub(crate) fn new(pool: &'a BufferPool, object: Arc<CacheableObject>, block: Arc<Block>) -> Self {
		Self {
			pool,
			object: Some(object),
			block,
		}
	}

	pub fn block(&self) -> &Block {
		&self.block
	}

	/// Keeps the pin outstanding past the guard; the caller owes a `release`.
	pub(crate) fn detach(mut self) -> Arc<Block> {
		self.object = None;
		self.block.clone()
	}

	/// Releases the pin now, surfacing any eviction failure it triggers.
	pub fn release(mut self) -> Result<()> {
		match self.object.take() {
			Some(object) => {
				self.pool.unpin_shared(&object)?;
				self.pool.after_release()
			}
			None => Ok(()),
		}
	}
}

impl Deref for ReadPin<'_> {
	type Target = Block;

	fn deref(&self) -> &Self::Target {
		&self.block
	}
}

impl Drop for ReadPin<'_> {
	fn drop(&mut self) {
		if let Some(object) = self.object.take() {
			let result = self.pool.unpin_shared(&object).and_then(|_| self.pool.after_release());
			if let Err(e) = result {
				error!(object = object.name(), error = %e, "failed to release read pin");
			}
		}
	}
}

/// Exclusive pin on one object.
///
/// A staged block replaces the current one only through [`WritePin::release`];
/// dropping the pin without it, as on an error path, discards the staged block.
pub struct WritePin<'a> {
	pool: &'a BufferPool,
	object: Option<Arc<CacheableObject>>,
	current: Option<Arc<Block>>,
	staged: Option<Block>,
}

impl<'a> WritePin<'a> {
	pub(crate) fn new(pool: &'a BufferPool, object: Arc<CacheableObject>, current: Option<Arc<Block>>) -> Self {
		Self {
			pool,
			object: Some(object),
			current,
			staged: None,
		}
	}

	pub fn name(&self) -> &str {
		self.object.as_deref().map_or("", |o| o.name())
	}

	/// The staged block if any, otherwise the current one.
	pub fn block(&self) -> Option<&Block> {
		self.staged.as_ref().or(self.current.as_deref())
	}

	/// Mutable access, copying the current block into the staging area on first use.
	pub fn block_mut(&mut self) -> Option<&mut Block> {
		if self.staged.is_none() {
			self.staged = self.current.as_deref().cloned();
		}
		self.staged.as_mut()
	}

	pub fn replace(&mut self, block: Block) -> Result<()> {
		self.pool.budget_for(self.name(), &block)?;
		self.staged = Some(block);
		Ok(())
	}

	/// Commits the staged block and releases the pin.
	pub fn release(mut self) -> Result<()> {
		let staged = self.staged.take();
		self.finish(staged)
	}

	fn finish(&mut self, staged: Option<Block>) -> Result<()> {
		match self.object.take() {
			Some(object) => {
				self.pool.commit_write(&object, staged)?;
				self.pool.after_release()
			}
			None => Ok(()),
		}
	}
}

impl Drop for WritePin<'_> {
	fn drop(&mut self) {
		if self.staged.take().is_some() {
			debug!(object = self.name(), "write pin dropped, staged block discarded");
		}
		if let Err(e) = self.finish(None) {
			error!(error = %e, "failed to release write pin");
		}
	}
}
