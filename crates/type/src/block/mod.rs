// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod frame;
mod matrix;

pub use frame::{FrameBlock, FrameColumn, FrameData};
pub use matrix::MatrixBlock;
use serde::{Deserialize, Serialize};

use crate::CacheableKind;

/// In-memory materialization of one cacheable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
	Matrix(MatrixBlock),
	Frame(FrameBlock),
}

impl Block {
	pub fn kind(&self) -> CacheableKind {
		match self {
			Block::Matrix(_) => CacheableKind::Matrix,
			Block::Frame(_) => CacheableKind::Frame,
		}
	}

	pub fn size_in_bytes(&self) -> usize {
		match self {
			Block::Matrix(m) => m.size_in_bytes(),
			Block::Frame(f) => f.size_in_bytes(),
		}
	}

	pub fn as_matrix(&self) -> Option<&MatrixBlock> {
		match self {
			Block::Matrix(m) => Some(m),
			Block::Frame(_) => None,
		}
	}

	pub fn as_frame(&self) -> Option<&FrameBlock> {
		match self {
			Block::Frame(f) => Some(f),
			Block::Matrix(_) => None,
		}
	}
}

impl From<MatrixBlock> for Block {
	fn from(value: MatrixBlock) -> Self {
		Block::Matrix(value)
	}
}

impl From<FrameBlock> for Block {
	fn from(value: FrameBlock) -> Self {
		Block::Frame(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_block_serde_round_trip() {
		let block = Block::from(MatrixBlock::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap());
		let bytes = postcard::to_stdvec(&block).unwrap();
		let back: Block = postcard::from_bytes(&bytes).unwrap();
		assert_eq!(block, back);
		assert_eq!(back.kind(), CacheableKind::Matrix);
	}
}
