// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	mem::size_of,
	ops::{Deref, Index},
};

use serde::{Deserialize, Serialize};

use crate::{ElementType, Error, Result, ScalarValue};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FrameData {
	Text(Vec<Option<String>>),
	Float8(Vec<Option<f64>>),
	Int8(Vec<Option<i64>>),
	Bool(Vec<Option<bool>>),
}

impl FrameData {
	pub fn len(&self) -> usize {
		match self {
			FrameData::Text(v) => v.len(),
			FrameData::Float8(v) => v.len(),
			FrameData::Int8(v) => v.len(),
			FrameData::Bool(v) => v.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn element_type(&self) -> ElementType {
		match self {
			FrameData::Text(_) => ElementType::Text,
			FrameData::Float8(_) => ElementType::Float8,
			FrameData::Int8(_) => ElementType::Int8,
			FrameData::Bool(_) => ElementType::Bool,
		}
	}

	pub fn get(&self, index: usize) -> Option<ScalarValue> {
		match self {
			FrameData::Text(v) => v.get(index)?.clone().map(ScalarValue::Text),
			FrameData::Float8(v) => v.get(index)?.map(ScalarValue::Float8),
			FrameData::Int8(v) => v.get(index)?.map(ScalarValue::Int8),
			FrameData::Bool(v) => v.get(index)?.map(ScalarValue::Bool),
		}
	}

	fn size_in_bytes(&self) -> usize {
		match self {
			FrameData::Text(v) => v
				.iter()
				.map(|s| size_of::<Option<String>>() + s.as_ref().map_or(0, |s| s.len()))
				.sum(),
			FrameData::Float8(v) => v.len() * size_of::<Option<f64>>(),
			FrameData::Int8(v) => v.len() * size_of::<Option<i64>>(),
			FrameData::Bool(v) => v.len() * size_of::<Option<bool>>(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameColumn {
	pub name: String,
	pub data: FrameData,
}

impl FrameColumn {
	pub fn new(name: impl Into<String>, data: FrameData) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}

	pub fn text<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
		Self::new(name, FrameData::Text(values.into_iter().map(|s| Some(s.into())).collect()))
	}

	pub fn float8(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
		Self::new(name, FrameData::Float8(values.into_iter().map(Some).collect()))
	}
}

impl Deref for FrameColumn {
	type Target = FrameData;

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

/// Columnar table with named, typed columns of equal length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameBlock {
	columns: Vec<FrameColumn>,
}

impl FrameBlock {
	pub fn new(columns: Vec<FrameColumn>) -> Result<Self> {
		if let Some(first) = columns.first() {
			let rows = first.len();
			for column in &columns[1..] {
				if column.len() != rows {
					return Err(Error::shape_mismatch(
						(rows, columns.len()),
						(column.len(), 1),
					));
				}
			}
		}
		Ok(Self {
			columns,
		})
	}

	pub fn empty() -> Self {
		Self {
			columns: Vec::new(),
		}
	}

	pub fn row_count(&self) -> usize {
		self.columns.first().map_or(0, |c| c.len())
	}

	pub fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub fn names(&self) -> Vec<&str> {
		self.columns.iter().map(|c| c.name.as_str()).collect()
	}

	pub fn schema(&self) -> Vec<ElementType> {
		self.columns.iter().map(|c| c.element_type()).collect()
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.name == name)
	}

	pub fn get(&self, row: usize, col: usize) -> Option<ScalarValue> {
		self.columns.get(col)?.get(row)
	}

	pub fn columns(&self) -> &[FrameColumn] {
		&self.columns
	}

	pub fn into_columns(self) -> Vec<FrameColumn> {
		self.columns
	}

	pub fn size_in_bytes(&self) -> usize {
		size_of::<Self>()
			+ self.columns.iter().map(|c| size_of::<FrameColumn>() + c.name.len() + c.data.size_in_bytes()).sum::<usize>()
	}
}

impl Deref for FrameBlock {
	type Target = [FrameColumn];

	fn deref(&self) -> &Self::Target {
		&self.columns
	}
}

impl Index<usize> for FrameBlock {
	type Output = FrameColumn;

	fn index(&self, index: usize) -> &Self::Output {
		self.columns.index(index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ErrorKind;

	fn cities() -> FrameBlock {
		FrameBlock::new(vec![
			FrameColumn::text("city", ["Oslo", "Lima", "Oslo"]),
			FrameColumn::float8("temp", [3.5, 19.0, -1.0]),
		])
		.unwrap()
	}

	#[test]
	fn test_shape_and_schema() {
		let frame = cities();
		assert_eq!(frame.row_count(), 3);
		assert_eq!(frame.column_count(), 2);
		assert_eq!(frame.names(), vec!["city", "temp"]);
		assert_eq!(frame.schema(), vec![ElementType::Text, ElementType::Float8]);
		assert_eq!(frame.column_index("temp"), Some(1));
	}

	#[test]
	fn test_get() {
		let frame = cities();
		assert_eq!(frame.get(1, 0), Some(ScalarValue::Text("Lima".to_string())));
		assert_eq!(frame.get(2, 1), Some(ScalarValue::Float8(-1.0)));
		assert_eq!(frame.get(3, 1), None);
	}

	#[test]
	fn test_unequal_columns() {
		let err = FrameBlock::new(vec![FrameColumn::text("a", ["x"]), FrameColumn::float8("b", [1.0, 2.0])])
			.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
	}
}
