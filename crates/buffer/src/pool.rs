// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{BTreeMap, HashMap},
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};

use parking_lot::{Mutex, RwLock};
use tabula_type::{Block, CacheableKind, Error, Result};
use tracing::{debug, error, instrument, warn};

use crate::{
	config::{BufferPoolConfig, SpillConfig},
	object::{CacheableObject, ObjectState, Slot},
	pin::{ReadPin, WritePin},
	spill::{FileSpillBackend, MemorySpillBackend, SpillBackend, SpillKey, SpilledBlock, codec},
};

#[derive(Default)]
struct Accounting {
	resident_bytes: usize,
	/// Resident, unpinned objects keyed by the tick of their last release.
	lru: BTreeMap<u64, Arc<CacheableObject>>,
}

/// Arbitrates access to cacheable objects under a memory budget.
///
/// Lock order: an object's slot lock may be held while taking the accounting
/// lock, never the other way around, and at most one slot lock is held at a time.
pub struct BufferPool {
	config: BufferPoolConfig,
	objects: RwLock<HashMap<String, Arc<CacheableObject>>>,
	accounting: Mutex<Accounting>,
	backend: Box<dyn SpillBackend>,
	tick: AtomicU64,
}

impl BufferPool {
	pub fn new(config: BufferPoolConfig) -> Self {
		let backend: Box<dyn SpillBackend> = match &config.spill {
			SpillConfig::Memory => Box::new(MemorySpillBackend::new()),
			SpillConfig::Directory(dir) => Box::new(FileSpillBackend::new(dir.clone())),
		};
		Self::with_backend(config, backend)
	}

	pub fn with_backend(config: BufferPoolConfig, backend: Box<dyn SpillBackend>) -> Self {
		debug!(budget = config.memory_budget, backend = backend.name(), "buffer pool created");
		Self {
			config,
			objects: RwLock::new(HashMap::new()),
			accounting: Mutex::new(Accounting::default()),
			backend,
			tick: AtomicU64::new(0),
		}
	}

	pub fn config(&self) -> &BufferPoolConfig {
		&self.config
	}

	/// Binds `name` to a fresh empty object unless it is already bound.
	#[instrument(name = "buffer::pool::create", level = "trace", skip(self))]
	pub fn create(&self, name: &str, kind: CacheableKind) -> Arc<CacheableObject> {
		let mut objects = self.objects.write();
		objects.entry(name.to_string()).or_insert_with(|| Arc::new(CacheableObject::new(name, kind))).clone()
	}

	/// Pins `name` for reading and returns its block. Must be paired with [`release`](Self::release).
	#[instrument(name = "buffer::pool::acquire_read", level = "trace", skip(self))]
	pub fn acquire_read(&self, name: &str) -> Result<Arc<Block>> {
		Ok(self.pin_read(name)?.detach())
	}

	/// Scoped read pin, released when the guard drops.
	pub fn pin_read(&self, name: &str) -> Result<ReadPin<'_>> {
		let object = self.lookup(name)?;
		let block = self.pin_shared(&object)?;
		let pin = ReadPin::new(self, object, block);
		self.enforce_budget()?;
		Ok(pin)
	}

	/// Pins `name` exclusively. Whatever the guard stages replaces the block on release.
	#[instrument(name = "buffer::pool::acquire_write", level = "trace", skip(self))]
	pub fn acquire_write(&self, name: &str) -> Result<WritePin<'_>> {
		let object = self.lookup(name)?;
		let current = self.pin_exclusive(&object, true)?;
		let pin = WritePin::new(self, object, current);
		self.enforce_budget()?;
		Ok(pin)
	}

	/// Releases one read pin taken with [`acquire_read`](Self::acquire_read).
	#[instrument(name = "buffer::pool::release", level = "trace", skip(self))]
	pub fn release(&self, name: &str) -> Result<()> {
		let object = self.lookup(name)?;
		self.unpin_shared(&object)?;
		self.enforce_budget()
	}

	/// Binds or rebinds `name` to a freshly produced block, leaving it unpinned.
	#[instrument(name = "buffer::pool::publish", level = "debug", skip(self, block), fields(size = block.size_in_bytes()))]
	pub fn publish(&self, name: &str, block: Block) -> Result<()> {
		self.check_budget(name, block.size_in_bytes())?;

		let object = loop {
			let object = self.create(name, block.kind());
			match self.pin_exclusive(&object, false) {
				Ok(_) => break object,
				// removed between lookup and pin, bind a fresh object
				Err(Error::UnresolvedVariable {
					..
				}) => continue,
				Err(e) => return Err(e),
			}
		};

		self.commit_write(&object, Some(block))?;
		self.enforce_budget()
	}

	/// Unbinds `name`, waiting for outstanding pins to drain first.
	#[instrument(name = "buffer::pool::remove", level = "debug", skip(self))]
	pub fn remove(&self, name: &str) -> Result<()> {
		let object = self.objects.write().remove(name).ok_or_else(|| Error::unresolved(name))?;
		self.destroy(&object, true)
	}

	/// Destroys every object without waiting on pins.
	pub fn clear(&self) -> Result<()> {
		let objects: Vec<_> = self.objects.write().drain().map(|(_, o)| o).collect();
		let mut result = Ok(());
		for object in objects {
			if let Err(e) = self.destroy(&object, false) {
				result = Err(e);
			}
		}
		result
	}

	/// Evicts `name` now if it is resident and unpinned. Returns whether it was evicted.
	#[instrument(name = "buffer::pool::evict", level = "debug", skip(self))]
	pub fn evict(&self, name: &str) -> Result<bool> {
		let object = self.lookup(name)?;
		self.evict_object(&object)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.objects.read().contains_key(name)
	}

	pub fn object(&self, name: &str) -> Option<Arc<CacheableObject>> {
		self.objects.read().get(name).cloned()
	}

	pub fn state(&self, name: &str) -> Option<ObjectState> {
		self.object(name).map(|o| o.state())
	}

	pub fn kind(&self, name: &str) -> Option<CacheableKind> {
		self.object(name).map(|o| o.kind())
	}

	pub fn pin_count(&self, name: &str) -> Option<usize> {
		self.object(name).map(|o| o.pin_count())
	}

	pub fn total_pins(&self) -> usize {
		self.objects.read().values().map(|o| o.pin_count()).sum()
	}

	pub fn resident_bytes(&self) -> usize {
		self.accounting.lock().resident_bytes
	}

	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.objects.read().keys().cloned().collect();
		names.sort();
		names
	}

	fn lookup(&self, name: &str) -> Result<Arc<CacheableObject>> {
		self.object(name).ok_or_else(|| Error::unresolved(name))
	}

	/// Fails with `BudgetExceeded` when `size` bytes could never be resident at once.
	pub fn check_budget(&self, name: &str, size: usize) -> Result<()> {
		if size > self.config.memory_budget {
			return Err(Error::budget_exceeded(name, size, self.config.memory_budget));
		}
		Ok(())
	}

	fn pin_shared(&self, object: &Arc<CacheableObject>) -> Result<Arc<Block>> {
		let mut slot = object.lock();
		object.wait_until(&mut slot, |s| !s.writer);

		match slot.state {
			ObjectState::Empty | ObjectState::Destroyed => return Err(Error::unresolved(object.name())),
			ObjectState::Evicted => self.restore(object, &mut slot)?,
			ObjectState::Resident => {}
		}

		let block = slot.block.clone().ok_or_else(|| Error::unresolved(object.name()))?;
		if slot.pins() == 0 {
			self.unlink(&mut slot);
		}
		slot.readers += 1;
		Ok(block)
	}

	pub(crate) fn unpin_shared(&self, object: &Arc<CacheableObject>) -> Result<()> {
		let mut slot = object.lock();
		if slot.readers == 0 {
			error!(object = object.name(), "unbalanced release");
			return Err(Error::UnbalancedRelease {
				name: object.name().to_string(),
			});
		}

		slot.readers -= 1;
		if slot.pins() == 0 && slot.state == ObjectState::Resident {
			self.link(object, &mut slot);
		}
		drop(slot);
		object.notify();
		Ok(())
	}

	fn pin_exclusive(&self, object: &Arc<CacheableObject>, restore: bool) -> Result<Option<Arc<Block>>> {
		let mut slot = object.lock();
		object.wait_until(&mut slot, |s| s.pins() == 0);

		match slot.state {
			ObjectState::Destroyed => return Err(Error::unresolved(object.name())),
			ObjectState::Evicted if restore => self.restore(object, &mut slot)?,
			_ => {}
		}

		self.unlink(&mut slot);
		slot.writer = true;
		Ok(slot.block.clone())
	}

	pub(crate) fn commit_write(&self, object: &Arc<CacheableObject>, staged: Option<Block>) -> Result<()> {
		let mut slot = object.lock();
		if !slot.writer {
			error!(object = object.name(), "unbalanced write release");
			return Err(Error::UnbalancedRelease {
				name: object.name().to_string(),
			});
		}

		slot.writer = false;
		let result = match staged {
			Some(block) => self.install(object, &mut slot, block),
			None => Ok(()),
		};
		if slot.state == ObjectState::Resident {
			self.link(object, &mut slot);
		}
		drop(slot);
		object.notify();
		result
	}

	pub(crate) fn after_release(&self) -> Result<()> {
		self.enforce_budget()
	}

	pub(crate) fn budget_for(&self, name: &str, block: &Block) -> Result<()> {
		self.check_budget(name, block.size_in_bytes())
	}

	fn install(&self, object: &CacheableObject, slot: &mut Slot, block: Block) -> Result<()> {
		let size = block.size_in_bytes();
		self.check_budget(object.name(), size)?;

		if let Some(spilled) = slot.spilled.take() {
			if let Err(e) = self.backend.remove(&spilled.key) {
				warn!(object = object.name(), error = %e, "failed to discard spilled data");
			}
		}

		{
			let mut accounting = self.accounting.lock();
			if slot.state == ObjectState::Resident {
				accounting.resident_bytes -= slot.resident_size;
			}
			accounting.resident_bytes += size;
		}

		slot.kind = block.kind();
		slot.block = Some(Arc::new(block));
		slot.resident_size = size;
		slot.state = ObjectState::Resident;
		Ok(())
	}

	fn restore(&self, object: &CacheableObject, slot: &mut Slot) -> Result<()> {
		let name = object.name();
		let spilled = slot.spilled.take().ok_or_else(|| Error::storage(name, "evicted object has no spilled data"))?;

		if let Err(e) = self.check_budget(name, spilled.resident_size) {
			slot.spilled = Some(spilled);
			return Err(e);
		}

		let block = match self.backend.read(&spilled.key).and_then(|bytes| codec::decode(&bytes)) {
			Ok(block) => block,
			Err(e) => {
				slot.spilled = Some(spilled);
				return Err(Error::storage(name, e.to_string()));
			}
		};

		if let Err(e) = self.backend.remove(&spilled.key) {
			warn!(object = name, error = %e, "failed to discard spilled data after restore");
		}

		let size = block.size_in_bytes();
		self.accounting.lock().resident_bytes += size;
		slot.block = Some(Arc::new(block));
		slot.resident_size = size;
		slot.state = ObjectState::Resident;

		debug!(object = name, size, bytes = spilled.bytes, "restored");
		Ok(())
	}

	fn evict_object(&self, object: &Arc<CacheableObject>) -> Result<bool> {
		let name = object.name();
		let mut slot = object.lock();
		if slot.pins() > 0 || slot.state != ObjectState::Resident {
			return Ok(false);
		}
		let Some(block) = slot.block.clone() else {
			return Ok(false);
		};

		let bytes =
			codec::encode(&block, self.config.compression_level).map_err(|e| Error::storage(name, e.to_string()))?;
		let key = SpillKey::new(name);
		self.backend.write(&key, &bytes).map_err(|e| Error::storage(name, e.to_string()))?;

		self.unlink(&mut slot);
		self.accounting.lock().resident_bytes -= slot.resident_size;
		slot.spilled = Some(SpilledBlock {
			key,
			bytes: bytes.len(),
			resident_size: slot.resident_size,
			compressed: codec::is_compressed(&bytes),
		});
		slot.block = None;
		slot.state = ObjectState::Evicted;

		debug!(object = name, size = slot.resident_size, bytes = bytes.len(), "evicted");
		Ok(true)
	}

	/// Evicts unpinned objects in least-recently-released order until the pool fits its budget.
	fn enforce_budget(&self) -> Result<()> {
		let budget = self.config.memory_budget;
		let candidates: Vec<Arc<CacheableObject>> = {
			let accounting = self.accounting.lock();
			if accounting.resident_bytes <= budget {
				return Ok(());
			}
			accounting.lru.values().cloned().collect()
		};

		for object in candidates {
			if self.resident_bytes() <= budget {
				return Ok(());
			}
			self.evict_object(&object)?;
		}

		let resident = self.resident_bytes();
		if resident > budget {
			warn!(resident, budget, "buffer pool over budget, remaining objects are pinned");
		}
		Ok(())
	}

	fn destroy(&self, object: &Arc<CacheableObject>, wait: bool) -> Result<()> {
		let mut slot = object.lock();
		if wait {
			object.wait_until(&mut slot, |s| s.pins() == 0);
		}

		self.unlink(&mut slot);
		if slot.state == ObjectState::Resident {
			self.accounting.lock().resident_bytes -= slot.resident_size;
		}
		slot.block = None;
		slot.resident_size = 0;
		slot.state = ObjectState::Destroyed;
		let spilled = slot.spilled.take();
		drop(slot);
		object.notify();

		if let Some(spilled) = spilled {
			self.backend.remove(&spilled.key).map_err(|e| Error::storage(object.name(), e.to_string()))?;
		}
		Ok(())
	}

	fn link(&self, object: &Arc<CacheableObject>, slot: &mut Slot) {
		let tick = self.tick.fetch_add(1, Ordering::Relaxed);
		let mut accounting = self.accounting.lock();
		if let Some(old) = slot.lru_tick.replace(tick) {
			accounting.lru.remove(&old);
		}
		accounting.lru.insert(tick, object.clone());
	}

	fn unlink(&self, slot: &mut Slot) {
		if let Some(tick) = slot.lru_tick.take() {
			self.accounting.lock().lru.remove(&tick);
		}
	}
}

impl Drop for BufferPool {
	fn drop(&mut self) {
		if let Err(e) = self.clear() {
			warn!(error = %e, "failed to clear buffer pool");
		}
	}
}
