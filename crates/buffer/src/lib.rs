// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Buffer pool for large cacheable objects.
//!
//! Every matrix or frame an instruction touches lives behind a named
//! [`CacheableObject`]. Instructions pin objects through the [`BufferPool`]
//! before reading or replacing them; unpinned objects may be evicted to a
//! [`SpillBackend`] whenever the resident size exceeds the configured budget,
//! and are restored transparently on the next pin.
//!
//! ```ignore
//! let pool = BufferPool::new(BufferPoolConfig::default().with_memory_budget(64 << 20));
//! pool.publish("A", MatrixBlock::zeros(4, 4)?.into())?;
//!
//! let a = pool.pin_read("A")?; // released when `a` drops
//! assert_eq!(a.as_matrix().unwrap().rows(), 4);
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod config;
mod object;
mod pin;
mod pool;
pub mod spill;

pub use config::{BufferPoolConfig, SpillConfig};
pub use object::{CacheableObject, ObjectState};
pub use pin::{ReadPin, WritePin};
pub use pool::BufferPool;
pub use spill::{FileSpillBackend, MemorySpillBackend, SpillBackend, SpillError, SpillKey, SpilledBlock};
