// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tabula_type::{Block, CacheableKind};

use crate::spill::SpilledBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
	/// Bound to a name but never written.
	Empty,
	Resident,
	Evicted,
	Destroyed,
}

impl Display for ObjectState {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ObjectState::Empty => f.write_str("empty"),
			ObjectState::Resident => f.write_str("resident"),
			ObjectState::Evicted => f.write_str("evicted"),
			ObjectState::Destroyed => f.write_str("destroyed"),
		}
	}
}

pub(crate) struct Slot {
	pub(crate) state: ObjectState,
	pub(crate) kind: CacheableKind,
	pub(crate) block: Option<Arc<Block>>,
	pub(crate) spilled: Option<SpilledBlock>,
	pub(crate) readers: usize,
	pub(crate) writer: bool,
	/// Size charged against the pool budget while resident.
	pub(crate) resident_size: usize,
	/// Position in the pool's release order; set only while resident and unpinned.
	pub(crate) lru_tick: Option<u64>,
}

impl Slot {
	#[inline]
	pub(crate) fn pins(&self) -> usize {
		self.readers + usize::from(self.writer)
	}
}

/// A named, long-lived handle over one logical matrix or frame.
pub struct CacheableObject {
	name: String,
	slot: Mutex<Slot>,
	released: Condvar,
}

impl CacheableObject {
	pub(crate) fn new(name: impl Into<String>, kind: CacheableKind) -> Self {
		Self {
			name: name.into(),
			slot: Mutex::new(Slot {
				state: ObjectState::Empty,
				kind,
				block: None,
				spilled: None,
				readers: 0,
				writer: false,
				resident_size: 0,
				lru_tick: None,
			}),
			released: Condvar::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn state(&self) -> ObjectState {
		self.slot.lock().state
	}

	pub fn kind(&self) -> CacheableKind {
		self.slot.lock().kind
	}

	pub fn pin_count(&self) -> usize {
		self.slot.lock().pins()
	}

	pub(crate) fn lock(&self) -> MutexGuard<'_, Slot> {
		self.slot.lock()
	}

	/// Blocks until `ready` holds for the slot.
	pub(crate) fn wait_until(&self, slot: &mut MutexGuard<'_, Slot>, ready: impl Fn(&Slot) -> bool) {
		while !ready(&**slot) {
			self.released.wait(slot);
		}
	}

	pub(crate) fn notify(&self) {
		self.released.notify_all();
	}
}
