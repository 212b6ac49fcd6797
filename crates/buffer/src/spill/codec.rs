// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_type::Block;

use super::SpillError;

const RAW: u8 = 0;
const ZSTD: u8 = 1;

/// Serializes a block; the first byte records whether the payload is zstd-compressed.
pub fn encode(block: &Block, compression_level: Option<i32>) -> Result<Vec<u8>, SpillError> {
	let serialized = postcard::to_stdvec(block)?;

	match compression_level {
		Some(level) => {
			let compressed = zstd::encode_all(serialized.as_slice(), level)?;
			let mut out = Vec::with_capacity(compressed.len() + 1);
			out.push(ZSTD);
			out.extend_from_slice(&compressed);
			Ok(out)
		}
		None => {
			let mut out = Vec::with_capacity(serialized.len() + 1);
			out.push(RAW);
			out.extend_from_slice(&serialized);
			Ok(out)
		}
	}
}

pub fn decode(bytes: &[u8]) -> Result<Block, SpillError> {
	let (header, payload) = bytes.split_first().ok_or_else(|| SpillError::Corrupt("empty payload".to_string()))?;

	match *header {
		RAW => Ok(postcard::from_bytes(payload)?),
		ZSTD => {
			let decompressed = zstd::decode_all(payload)?;
			Ok(postcard::from_bytes(&decompressed)?)
		}
		other => Err(SpillError::Corrupt(format!("unknown header byte {}", other))),
	}
}

pub fn is_compressed(bytes: &[u8]) -> bool {
	bytes.first() == Some(&ZSTD)
}
