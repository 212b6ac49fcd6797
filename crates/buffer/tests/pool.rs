// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs, io,
	sync::{
		Arc, Barrier,
		atomic::{AtomicBool, Ordering},
	},
	thread,
	time::Duration,
};

use tabula_buffer::{
	BufferPool, BufferPoolConfig, MemorySpillBackend, ObjectState, SpillBackend, SpillError, SpillKey,
};
use tabula_testing::temp_dir;
use tabula_type::{Block, CacheableKind, Error, FrameBlock, FrameColumn, MatrixBlock};

/// 10x10 matrices occupy 840 bytes each; this budget holds two of them.
const TWO_BLOCKS: usize = 2000;

fn block(seed: f64) -> Block {
	MatrixBlock::from_fn(10, 10, |r, c| seed + (r * 10 + c) as f64).unwrap().into()
}

fn pool(budget: usize) -> BufferPool {
	tabula_testing::init_tracing();
	BufferPool::new(BufferPoolConfig::default().with_memory_budget(budget))
}

fn first(block: &Block) -> f64 {
	block.as_matrix().unwrap().get(0, 0)
}

mod pinning {
	use super::*;

	#[test]
	fn test_acquire_release_balance() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		assert_eq!(pool.pin_count("A"), Some(0));

		let a = pool.acquire_read("A").unwrap();
		assert_eq!(first(&a), 1.0);
		assert_eq!(pool.pin_count("A"), Some(1));

		pool.release("A").unwrap();
		assert_eq!(pool.pin_count("A"), Some(0));
		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_guard_releases_on_drop() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		{
			let a = pool.pin_read("A").unwrap();
			let b = pool.pin_read("A").unwrap();
			assert_eq!(first(&a), first(&b));
			assert_eq!(pool.pin_count("A"), Some(2));
		}
		assert_eq!(pool.pin_count("A"), Some(0));
	}

	#[test]
	fn test_release_without_pin() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		assert!(matches!(pool.release("A"), Err(Error::UnbalancedRelease { name }) if name == "A"));
		assert!(matches!(pool.release("missing"), Err(Error::UnresolvedVariable { .. })));
	}

	#[test]
	fn test_read_of_empty_object() {
		let pool = pool(TWO_BLOCKS);
		pool.create("A", CacheableKind::Matrix);
		assert_eq!(pool.state("A"), Some(ObjectState::Empty));
		assert!(matches!(pool.pin_read("A"), Err(Error::UnresolvedVariable { .. })));
		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_write_pin_replaces_block() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();

		let mut w = pool.acquire_write("A").unwrap();
		assert_eq!(first(w.block().unwrap()), 1.0);
		if let Some(Block::Matrix(m)) = w.block_mut() {
			m.set(0, 0, 42.0);
		}
		w.release().unwrap();

		assert_eq!(first(&pool.pin_read("A").unwrap()), 42.0);
		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_write_pin_on_empty_object() {
		let pool = pool(TWO_BLOCKS);
		pool.create("A", CacheableKind::Matrix);

		let mut w = pool.acquire_write("A").unwrap();
		assert!(w.block().is_none());
		w.replace(block(7.0)).unwrap();
		w.release().unwrap();

		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(first(&pool.pin_read("A").unwrap()), 7.0);
	}

	#[test]
	fn test_dropped_write_pin_discards_staged_block() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();

		{
			let mut w = pool.acquire_write("A").unwrap();
			w.replace(block(5.0)).unwrap();
			if let Some(Block::Matrix(m)) = w.block_mut() {
				m.set(0, 0, 42.0);
			}
		}

		assert_eq!(pool.total_pins(), 0);
		assert_eq!(first(&pool.pin_read("A").unwrap()), 1.0);

		pool.create("B", CacheableKind::Matrix);
		let mut w = pool.acquire_write("B").unwrap();
		w.replace(block(2.0)).unwrap();
		drop(w);
		assert_eq!(pool.state("B"), Some(ObjectState::Empty));
		assert_eq!(pool.pin_count("B"), Some(0));
	}

	#[test]
	fn test_write_pin_restores_evicted_object() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(3.0)).unwrap();
		let before = pool.pin_read("A").unwrap().block().clone();

		assert!(pool.evict("A").unwrap());
		assert_eq!(pool.state("A"), Some(ObjectState::Evicted));

		let w = pool.acquire_write("A").unwrap();
		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(w.block(), Some(&before));
		w.release().unwrap();

		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(*pool.pin_read("A").unwrap(), before);
		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_republish_changes_kind() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		let frame = FrameBlock::new(vec![FrameColumn::text("c", ["x"])]).unwrap();
		pool.publish("A", frame.into()).unwrap();
		assert_eq!(pool.kind("A"), Some(CacheableKind::Frame));
		assert_eq!(pool.names(), vec!["A".to_string()]);
	}
}

mod eviction {
	use super::*;

	#[test]
	fn test_least_recently_released_is_evicted() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		pool.publish("B", block(2.0)).unwrap();

		drop(pool.pin_read("A").unwrap());
		pool.publish("C", block(3.0)).unwrap();

		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(pool.state("B"), Some(ObjectState::Evicted));
		assert_eq!(pool.state("C"), Some(ObjectState::Resident));
		assert!(pool.resident_bytes() <= TWO_BLOCKS);
	}

	#[test]
	fn test_restore_on_pin() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		pool.publish("B", block(2.0)).unwrap();
		pool.publish("C", block(3.0)).unwrap();
		assert_eq!(pool.state("A"), Some(ObjectState::Evicted));

		let a = pool.pin_read("A").unwrap();
		assert_eq!(*a, block(1.0));
		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(pool.state("B"), Some(ObjectState::Evicted));
	}

	#[test]
	fn test_pinned_objects_stay_resident() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		let _a = pool.pin_read("A").unwrap();

		pool.publish("B", block(2.0)).unwrap();
		pool.publish("C", block(3.0)).unwrap();

		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
		assert_eq!(pool.state("B"), Some(ObjectState::Evicted));
	}

	#[test]
	fn test_over_budget_when_everything_is_pinned() {
		let pool = pool(1000);
		pool.publish("A", block(1.0)).unwrap();
		let _a = pool.pin_read("A").unwrap();
		pool.publish("B", block(2.0)).unwrap();
		assert_eq!(pool.state("B"), Some(ObjectState::Evicted));

		let _b = pool.pin_read("B").unwrap();
		assert_eq!(pool.resident_bytes(), 2 * block(0.0).size_in_bytes());
	}

	#[test]
	fn test_block_larger_than_budget() {
		let pool = pool(100);
		let err = pool.publish("A", block(1.0)).unwrap_err();
		assert!(matches!(err, Error::BudgetExceeded { size, budget: 100, .. } if size == block(1.0).size_in_bytes()), "{err}");
		assert!(!pool.contains("A"));
	}

	#[test]
	fn test_explicit_evict() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();

		let pinned = pool.pin_read("A").unwrap();
		assert!(!pool.evict("A").unwrap());
		drop(pinned);

		assert!(pool.evict("A").unwrap());
		assert_eq!(pool.resident_bytes(), 0);
		assert!(!pool.evict("A").unwrap());
	}

	#[test]
	fn test_file_spill_round_trip() {
		temp_dir(|dir| {
			let pool = BufferPool::new(
				BufferPoolConfig::default().with_memory_budget(TWO_BLOCKS).with_spill_dir(dir).with_compression(3),
			);
			pool.publish("A", block(1.0)).unwrap();
			assert!(pool.evict("A").unwrap());
			assert_eq!(fs::read_dir(dir)?.count(), 1);

			assert_eq!(*pool.pin_read("A").unwrap(), block(1.0));
			assert_eq!(fs::read_dir(dir)?.count(), 0);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_frame_survives_eviction() {
		let pool = pool(TWO_BLOCKS);
		let frame: Block = FrameBlock::new(vec![
			FrameColumn::text("name", ["a", "b"]),
			FrameColumn::float8("score", [1.5, 2.5]),
		])
		.unwrap()
		.into();
		pool.publish("F", frame.clone()).unwrap();
		assert!(pool.evict("F").unwrap());
		assert_eq!(*pool.pin_read("F").unwrap(), frame);
	}
}

mod lifecycle {
	use super::*;

	#[test]
	fn test_remove_discards_spilled_data() {
		let backend = MemorySpillBackend::new();
		let pool = BufferPool::with_backend(
			BufferPoolConfig::default().with_memory_budget(TWO_BLOCKS),
			Box::new(backend.clone()),
		);
		pool.publish("A", block(1.0)).unwrap();
		assert!(pool.evict("A").unwrap());
		assert_eq!(backend.len(), 1);

		pool.remove("A").unwrap();
		assert!(backend.is_empty());
		assert!(!pool.contains("A"));
		assert!(matches!(pool.remove("A"), Err(Error::UnresolvedVariable { .. })));
	}

	#[test]
	fn test_remove_waits_for_pins() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		let object = pool.object("A").unwrap();

		thread::scope(|s| {
			let pin = pool.pin_read("A").unwrap();
			let remover = s.spawn(|| pool.remove("A"));
			thread::sleep(Duration::from_millis(20));
			assert_eq!(object.state(), ObjectState::Resident);
			drop(pin);
			remover.join().unwrap().unwrap();
		});

		assert_eq!(object.state(), ObjectState::Destroyed);
		assert_eq!(pool.resident_bytes(), 0);
	}

	#[test]
	fn test_clear() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		pool.publish("B", block(2.0)).unwrap();
		pool.clear().unwrap();
		assert!(pool.names().is_empty());
		assert_eq!(pool.resident_bytes(), 0);
	}
}

mod concurrency {
	use super::*;

	#[test]
	fn test_concurrent_readers() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		let pinned = Barrier::new(4);
		let checked = Barrier::new(4);

		thread::scope(|s| {
			for _ in 0..4 {
				s.spawn(|| {
					let a = pool.pin_read("A").unwrap();
					pinned.wait();
					assert_eq!(pool.pin_count("A"), Some(4));
					checked.wait();
					assert_eq!(first(&a), 1.0);
				});
			}
		});

		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_writer_blocks_readers() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();

		thread::scope(|s| {
			let mut w = pool.acquire_write("A").unwrap();
			w.replace(block(9.0)).unwrap();

			let reader = s.spawn(|| first(&pool.pin_read("A").unwrap()));
			thread::sleep(Duration::from_millis(20));
			w.release().unwrap();

			assert_eq!(reader.join().unwrap(), 9.0);
		});
	}

	#[test]
	fn test_readers_block_writer() {
		let pool = pool(TWO_BLOCKS);
		pool.publish("A", block(1.0)).unwrap();
		let acquired = AtomicBool::new(false);

		thread::scope(|s| {
			let r = pool.pin_read("A").unwrap();

			let writer = s.spawn(|| {
				let mut w = pool.acquire_write("A").unwrap();
				acquired.store(true, Ordering::SeqCst);
				w.replace(block(9.0)).unwrap();
				w.release().unwrap();
			});

			thread::sleep(Duration::from_millis(20));
			assert!(!acquired.load(Ordering::SeqCst));
			assert_eq!(first(&r), 1.0);

			r.release().unwrap();
			writer.join().unwrap();
		});

		assert!(acquired.load(Ordering::SeqCst));
		assert_eq!(first(&pool.pin_read("A").unwrap()), 9.0);
		assert_eq!(pool.total_pins(), 0);
	}

	#[test]
	fn test_concurrent_publish() {
		let pool = Arc::new(pool(4 * TWO_BLOCKS));
		thread::scope(|s| {
			for i in 0..8 {
				let pool = pool.clone();
				s.spawn(move || {
					let name = format!("M{i}");
					pool.publish(&name, block(i as f64)).unwrap();
					assert_eq!(first(&pool.pin_read(&name).unwrap()), i as f64);
				});
			}
		});
		assert_eq!(pool.names().len(), 8);
		assert_eq!(pool.total_pins(), 0);
	}
}

mod failure {
	use super::*;

	struct FullDisk;

	impl SpillBackend for FullDisk {
		fn write(&self, _key: &SpillKey, _bytes: &[u8]) -> Result<(), SpillError> {
			Err(SpillError::Io(io::Error::other("no space left on device")))
		}

		fn read(&self, key: &SpillKey) -> Result<Vec<u8>, SpillError> {
			Err(SpillError::NotFound(key.clone()))
		}

		fn remove(&self, _key: &SpillKey) -> Result<(), SpillError> {
			Ok(())
		}

		fn name(&self) -> &str {
			"full"
		}
	}

	#[test]
	fn test_eviction_failure_is_storage_failure() {
		let pool =
			BufferPool::with_backend(BufferPoolConfig::default().with_memory_budget(TWO_BLOCKS), Box::new(FullDisk));
		pool.publish("A", block(1.0)).unwrap();
		pool.publish("B", block(2.0)).unwrap();

		let err = pool.publish("C", block(3.0)).unwrap_err();
		assert!(matches!(err, Error::StorageFailure { ref name, .. } if name == "A"), "{err}");
		assert!(err.is_fatal());
		assert_eq!(pool.state("A"), Some(ObjectState::Resident));
	}
}
