// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Deserialize;
use tabula_type::{Error, Result};

/// A column addressed by name or by 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
	Id(usize),
	Name(String),
}

/// Parsed transform specification, e.g. `{"ids": false, "recode": ["city"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransformSpec {
	#[serde(default)]
	pub ids: bool,
	#[serde(default)]
	pub recode: Vec<ColumnRef>,
}

impl TransformSpec {
	pub fn parse(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(|e| Error::transform(format!("invalid transform spec: {e}")))
	}

	/// Flags, per column, whether it is recoded.
	pub fn recoded_columns(&self, names: &[&str]) -> Result<Vec<bool>> {
		let mut mask = vec![false; names.len()];
		for column in &self.recode {
			let index = match column {
				ColumnRef::Id(id) if (1..=names.len()).contains(id) => id - 1,
				ColumnRef::Id(id) => {
					return Err(Error::transform(format!(
						"recode column id {id} outside 1..={}",
						names.len()
					)));
				}
				ColumnRef::Name(_) if self.ids => {
					return Err(Error::transform("recode entries must be column ids when ids is true"));
				}
				ColumnRef::Name(name) => names
					.iter()
					.position(|n| *n == name.as_str())
					.ok_or_else(|| Error::transform(format!("unknown recode column '{name}'")))?,
			};
			mask[index] = true;
		}
		Ok(mask)
	}
}
