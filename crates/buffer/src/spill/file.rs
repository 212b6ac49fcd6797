// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use super::{SpillBackend, SpillError, SpillKey};

/// One file per spilled block under a scratch directory.
pub struct FileSpillBackend {
	dir: PathBuf,
}

impl FileSpillBackend {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self {
			dir: dir.into(),
		}
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn path(&self, key: &SpillKey) -> PathBuf {
		self.dir.join(format!("{}.blk", key.as_str()))
	}
}

impl SpillBackend for FileSpillBackend {
	fn write(&self, key: &SpillKey, bytes: &[u8]) -> Result<(), SpillError> {
		fs::create_dir_all(&self.dir)?;
		fs::write(self.path(key), bytes)?;
		Ok(())
	}

	fn read(&self, key: &SpillKey) -> Result<Vec<u8>, SpillError> {
		match fs::read(self.path(key)) {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(SpillError::NotFound(key.clone())),
			Err(e) => Err(e.into()),
		}
	}

	fn remove(&self, key: &SpillKey) -> Result<(), SpillError> {
		match fs::remove_file(self.path(key)) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}

	fn name(&self) -> &str {
		"file"
	}
}

#[cfg(test)]
mod tests {
	use tabula_testing::temp_dir;

	use super::*;

	#[test]
	fn test_write_read_remove() {
		temp_dir(|dir| {
			let backend = FileSpillBackend::new(dir.join("spill"));
			let key = SpillKey::new("weights/2024");

			backend.write(&key, b"payload").unwrap();
			assert_eq!(backend.read(&key).unwrap(), b"payload".to_vec());
			assert!(backend.path(&key).exists());

			backend.remove(&key).unwrap();
			assert!(!backend.path(&key).exists());
			assert!(matches!(backend.read(&key), Err(SpillError::NotFound(_))));
			// removing twice is fine
			backend.remove(&key).unwrap();
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_key_is_path_safe() {
		let key = SpillKey::new("../etc/passwd");
		assert!(!key.as_str().contains('/'));
		assert!(key.as_str().starts_with("___etc_passwd-"));
	}
}
