// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, ops::Deref};

use parking_lot::RwLock;
use tabula_buffer::{BufferPool, BufferPoolConfig, ReadPin};
use tabula_type::{Block, CacheableKind, Error, FrameBlock, MatrixBlock, Result, ScalarValue, ValueKind};
use tracing::{debug, instrument};

/// Configuration for one program run.
#[derive(Debug, Clone)]
pub struct ContextConfig {
	pub pool: BufferPoolConfig,
	/// Upper bound on the worker threads a single instruction may use.
	pub max_parallelism: usize,
}

impl Default for ContextConfig {
	fn default() -> Self {
		Self {
			pool: BufferPoolConfig::default(),
			max_parallelism: num_cpus::get(),
		}
	}
}

impl ContextConfig {
	pub fn with_pool(mut self, pool: BufferPoolConfig) -> Self {
		self.pool = pool;
		self
	}

	pub fn with_max_parallelism(mut self, threads: usize) -> Self {
		self.max_parallelism = threads.max(1);
		self
	}
}

/// Variable bindings of one program run: cacheable blocks in the buffer pool, scalars alongside.
///
/// A name is bound in at most one of the two tables. Dropping the context
/// destroys every object and its spilled data.
pub struct ExecutionContext {
	max_parallelism: usize,
	pool: BufferPool,
	scalars: RwLock<HashMap<String, ScalarValue>>,
}

impl Default for ExecutionContext {
	fn default() -> Self {
		Self::new(ContextConfig::default())
	}
}

impl ExecutionContext {
	pub fn new(config: ContextConfig) -> Self {
		Self {
			max_parallelism: config.max_parallelism.max(1),
			pool: BufferPool::new(config.pool),
			scalars: RwLock::new(HashMap::new()),
		}
	}

	pub fn pool(&self) -> &BufferPool {
		&self.pool
	}

	pub fn max_parallelism(&self) -> usize {
		self.max_parallelism
	}

	pub fn value_kind(&self, name: &str) -> Option<ValueKind> {
		if self.scalars.read().contains_key(name) {
			return Some(ValueKind::Scalar);
		}
		self.pool.kind(name).map(|k| k.value_kind())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.value_kind(name).is_some()
	}

	pub fn scalar(&self, name: &str) -> Result<ScalarValue> {
		self.scalars.read().get(name).cloned().ok_or_else(|| Error::unresolved(name))
	}

	#[instrument(name = "engine::context::set_scalar", level = "trace", skip(self, value))]
	pub fn set_scalar(&self, name: &str, value: impl Into<ScalarValue>) -> Result<()> {
		if self.pool.contains(name) {
			self.pool.remove(name)?;
		}
		self.scalars.write().insert(name.to_string(), value.into());
		Ok(())
	}

	/// Fails with `BudgetExceeded` before a `rows x cols` output that could never be resident is built.
	pub fn reserve_matrix(&self, name: &str, rows: usize, cols: usize) -> Result<()> {
		let size = MatrixBlock::size_for(rows, cols).unwrap_or(usize::MAX);
		self.pool.check_budget(name, size)
	}

	pub fn set_matrix_output(&self, name: &str, matrix: MatrixBlock) -> Result<()> {
		self.publish(name, matrix.into())
	}

	pub fn set_frame_output(&self, name: &str, frame: FrameBlock) -> Result<()> {
		self.publish(name, frame.into())
	}

	fn publish(&self, name: &str, block: Block) -> Result<()> {
		self.scalars.write().remove(name);
		self.pool.publish(name, block)
	}

	/// Pins a cacheable variable of either kind.
	pub fn pin(&self, name: &str) -> Result<ReadPin<'_>> {
		if self.scalars.read().contains_key(name) {
			return Err(Error::UnsupportedCacheableKind {
				name: name.to_string(),
				expected: "matrix or frame".to_string(),
				actual: ValueKind::Scalar,
			});
		}
		self.pool.pin_read(name)
	}

	pub fn pin_matrix(&self, name: &str) -> Result<MatrixPin<'_>> {
		let pin = self.pin_kind(name, CacheableKind::Matrix)?;
		Ok(MatrixPin(pin))
	}

	pub fn pin_frame(&self, name: &str) -> Result<FramePin<'_>> {
		let pin = self.pin_kind(name, CacheableKind::Frame)?;
		Ok(FramePin(pin))
	}

	fn pin_kind(&self, name: &str, expected: CacheableKind) -> Result<ReadPin<'_>> {
		if self.scalars.read().contains_key(name) {
			return Err(Error::unsupported_kind(name, expected, ValueKind::Scalar));
		}
		let pin = self.pool.pin_read(name)?;
		if pin.kind() != expected {
			return Err(Error::unsupported_kind(name, expected, pin.kind().value_kind()));
		}
		Ok(pin)
	}

	/// Unbinds a variable of any kind.
	#[instrument(name = "engine::context::remove_variable", level = "trace", skip(self))]
	pub fn remove_variable(&self, name: &str) -> Result<()> {
		if self.scalars.write().remove(name).is_some() {
			return Ok(());
		}
		self.pool.remove(name)?;
		debug!(variable = name, "removed");
		Ok(())
	}

	pub fn total_pins(&self) -> usize {
		self.pool.total_pins()
	}
}

/// Read pin on a variable known to hold a matrix.
pub struct MatrixPin<'a>(ReadPin<'a>);

impl Deref for MatrixPin<'_> {
	type Target = MatrixBlock;

	fn deref(&self) -> &Self::Target {
		match self.0.block() {
			Block::Matrix(matrix) => matrix,
			Block::Frame(_) => unreachable!("kind is checked when pinning"),
		}
	}
}

/// Read pin on a variable known to hold a frame.
pub struct FramePin<'a>(ReadPin<'a>);

impl Deref for FramePin<'_> {
	type Target = FrameBlock;

	fn deref(&self) -> &Self::Target {
		match self.0.block() {
			Block::Frame(frame) => frame,
			Block::Matrix(_) => unreachable!("kind is checked when pinning"),
		}
	}
}
