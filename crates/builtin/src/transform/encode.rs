// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeSet;

use tabula_type::{Error, FrameBlock, FrameColumn, FrameData, MatrixBlock, Result};
use tracing::{debug, instrument};

use super::{RecodeMap, TransformSpec};

/// Encodes `frame` into a matrix, building fresh recode maps. Returns the matrix and its metadata frame.
#[instrument(name = "builtin::transform::encode", level = "debug", skip_all, fields(rows = frame.row_count()))]
pub fn encode(frame: &FrameBlock, spec: &TransformSpec) -> Result<(MatrixBlock, FrameBlock)> {
	let recoded = spec.recoded_columns(&frame.names())?;

	let maps: Vec<Option<RecodeMap>> = frame
		.columns()
		.iter()
		.zip(&recoded)
		.map(|(column, &recode)| {
			recode.then(|| {
				let tokens: BTreeSet<String> =
					(0..column.len()).filter_map(|row| column.get(row)).map(|v| v.to_string()).collect();
				RecodeMap::from_tokens(tokens)
			})
		})
		.collect();

	let matrix = encode_with(frame, &maps)?;
	let meta = meta_frame(frame, &maps)?;
	debug!(recoded = maps.iter().flatten().count(), "encoded");
	Ok((matrix, meta))
}

/// Encodes `frame` with the recode maps stored in `meta`. Tokens missing from a map encode as NaN.
#[instrument(name = "builtin::transform::apply", level = "debug", skip_all, fields(rows = frame.row_count()))]
pub fn apply(frame: &FrameBlock, spec: &TransformSpec, meta: &FrameBlock) -> Result<MatrixBlock> {
	if meta.column_count() != frame.column_count() {
		return Err(Error::shape_mismatch(
			(frame.row_count(), frame.column_count()),
			(meta.row_count(), meta.column_count()),
		));
	}

	let recoded = spec.recoded_columns(&frame.names())?;
	let maps = recoded
		.iter()
		.zip(meta.columns())
		.map(|(&recode, column)| {
			if recode {
				RecodeMap::from_meta(&column.name, &column.data).map(Some)
			} else {
				Ok(None)
			}
		})
		.collect::<Result<Vec<_>>>()?;

	encode_with(frame, &maps)
}

fn encode_with(frame: &FrameBlock, maps: &[Option<RecodeMap>]) -> Result<MatrixBlock> {
	let rows = frame.row_count();
	let cols = frame.column_count();
	let mut values = vec![f64::NAN; rows * cols];

	for (c, (column, map)) in frame.columns().iter().zip(maps).enumerate() {
		for row in 0..rows {
			let Some(value) = column.get(row) else {
				continue;
			};
			values[row * cols + c] = match map {
				Some(map) => map.code(&value.to_string()).map_or(f64::NAN, |code| code as f64),
				None => value.as_f64().ok_or_else(|| {
					Error::invalid_block(format!(
						"column '{}' row {} holds non-numeric '{value}' and is not recoded",
						column.name,
						row + 1
					))
				})?,
			};
		}
	}

	MatrixBlock::from_vec(rows, cols, values)
}

fn meta_frame(frame: &FrameBlock, maps: &[Option<RecodeMap>]) -> Result<FrameBlock> {
	let rows = maps.iter().flatten().map(RecodeMap::len).max().unwrap_or(0);
	let columns = frame
		.columns()
		.iter()
		.zip(maps)
		.map(|(column, map)| {
			let mut cells: Vec<Option<String>> = match map {
				Some(map) => map.to_meta().map(Some).collect(),
				None => Vec::new(),
			};
			cells.resize(rows, None);
			FrameColumn::new(column.name.clone(), FrameData::Text(cells))
		})
		.collect();
	FrameBlock::new(columns)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn people() -> FrameBlock {
		FrameBlock::new(vec![
			FrameColumn::text("city", ["rome", "berlin", "rome", "oslo"]),
			FrameColumn::float8("age", [31.0, 45.0, 27.0, 52.0]),
		])
		.unwrap()
	}

	fn spec() -> TransformSpec {
		TransformSpec::parse(r#"{"recode": ["city"]}"#).unwrap()
	}

	#[test]
	fn test_encode() {
		let (matrix, meta) = encode(&people(), &spec()).unwrap();
		assert_eq!(
			matrix,
			MatrixBlock::from_rows(&[[3.0, 31.0], [1.0, 45.0], [3.0, 27.0], [2.0, 52.0]]).unwrap()
		);
		assert_eq!(meta.names(), vec!["city", "age"]);
		assert_eq!(meta.row_count(), 3);
		assert_eq!(meta.get(0, 0).unwrap().to_string(), "berlin\u{00b7}1");
		assert_eq!(meta.get(0, 1), None);
	}

	#[test]
	fn test_apply_reuses_codes() {
		let (_, meta) = encode(&people(), &spec()).unwrap();
		let fresh = FrameBlock::new(vec![
			FrameColumn::text("city", ["oslo", "paris"]),
			FrameColumn::float8("age", [1.0, 2.0]),
		])
		.unwrap();
		let matrix = apply(&fresh, &spec(), &meta).unwrap();
		assert_eq!(matrix.get(0, 0), 2.0);
		assert!(matrix.get(1, 0).is_nan());
		assert_eq!(matrix.get(1, 1), 2.0);
	}

	#[test]
	fn test_non_numeric_pass_through() {
		let none = TransformSpec::default();
		assert!(matches!(encode(&people(), &none), Err(Error::InvalidBlockValue { .. })));
	}

	#[test]
	fn test_missing_cells() {
		let frame = FrameBlock::new(vec![FrameColumn::new("x", FrameData::Float8(vec![Some(1.0), None]))]).unwrap();
		let (matrix, _) = encode(&frame, &TransformSpec::default()).unwrap();
		assert_eq!(matrix.get(0, 0), 1.0);
		assert!(matrix.get(1, 0).is_nan());
	}

	#[test]
	fn test_apply_shape() {
		let meta = FrameBlock::new(vec![FrameColumn::text("city", ["a\u{00b7}1"])]).unwrap();
		assert!(matches!(apply(&people(), &spec(), &meta), Err(Error::ShapeMismatch { .. })));
	}
}
