// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tabula_type::{Error, FrameData, Result};

use super::RECODE_DELIM;

/// Token to code assignment of one column. Codes are 1-based and follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecodeMap {
	codes: IndexMap<String, usize>,
}

impl RecodeMap {
	/// Assigns codes 1.. in ascending token order.
	pub fn from_tokens(tokens: BTreeSet<String>) -> Self {
		Self {
			codes: tokens.into_iter().enumerate().map(|(i, token)| (token, i + 1)).collect(),
		}
	}

	/// Rebuilds a map from `token·code` metadata cells. Missing cells are skipped.
	pub fn from_meta(column: &str, data: &FrameData) -> Result<Self> {
		let FrameData::Text(cells) = data else {
			return Err(Error::transform(format!("metadata column '{column}' is not text")));
		};

		let mut entries = Vec::with_capacity(cells.len());
		for cell in cells.iter().flatten() {
			let (token, code) = cell
				.rsplit_once(RECODE_DELIM)
				.ok_or_else(|| Error::transform(format!("malformed recode entry '{cell}' in '{column}'")))?;
			let code: usize = code
				.trim()
				.parse()
				.map_err(|_| Error::transform(format!("malformed recode code '{code}' in '{column}'")))?;
			entries.push((code, token.to_string()));
		}
		entries.sort_by_key(|(code, _)| *code);

		let mut codes = IndexMap::with_capacity(entries.len());
		for (position, (code, token)) in entries.into_iter().enumerate() {
			if code != position + 1 {
				return Err(Error::transform(format!("recode codes of '{column}' are not contiguous from 1")));
			}
			codes.insert(token, code);
		}
		Ok(Self {
			codes,
		})
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}

	pub fn code(&self, token: &str) -> Option<usize> {
		self.codes.get(token).copied()
	}

	pub fn token(&self, code: usize) -> Option<&str> {
		self.codes.get_index(code.checked_sub(1)?).map(|(token, _)| token.as_str())
	}

	/// Metadata cells in code order.
	pub fn to_meta(&self) -> impl Iterator<Item = String> + '_ {
		self.codes.iter().map(|(token, code)| format!("{token}{RECODE_DELIM}{code}"))
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.codes.iter().map(|(token, code)| (token.as_str(), *code))
	}
}
