// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_type::{Error, FrameBlock, FrameColumn, FrameData, MatrixBlock, Result};
use tracing::instrument;

use super::{RecodeMap, TransformSpec};

/// Decodes an encoded matrix back into a frame shaped like `meta`.
///
/// Recoded columns map codes back to their tokens as text; codes without a
/// token and NaN cells become missing. Other columns decode to doubles.
#[instrument(name = "builtin::transform::decode", level = "debug", skip_all, fields(rows = matrix.rows()))]
pub fn decode(matrix: &MatrixBlock, spec: &TransformSpec, meta: &FrameBlock) -> Result<FrameBlock> {
	if matrix.cols() != meta.column_count() {
		return Err(Error::shape_mismatch(matrix.shape(), (meta.row_count(), meta.column_count())));
	}

	let recoded = spec.recoded_columns(&meta.names())?;
	let rows = matrix.rows();

	let columns = meta
		.columns()
		.iter()
		.zip(recoded)
		.enumerate()
		.map(|(c, (column, recode))| {
			let data = if recode {
				let map = RecodeMap::from_meta(&column.name, &column.data)?;
				FrameData::Text(
					(0..rows)
						.map(|r| {
							let code = matrix.get(r, c);
							if code.is_finite() && code >= 1.0 && code.fract() == 0.0 {
								map.token(code as usize).map(str::to_string)
							} else {
								None
							}
						})
						.collect(),
				)
			} else {
				FrameData::Float8((0..rows).map(|r| Some(matrix.get(r, c)).filter(|v| !v.is_nan())).collect())
			};
			Ok(FrameColumn::new(column.name.clone(), data))
		})
		.collect::<Result<Vec<_>>>()?;

	FrameBlock::new(columns)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::encode;

	#[test]
	fn test_round_trip() {
		let frame = FrameBlock::new(vec![
			FrameColumn::text("city", ["rome", "berlin", "rome"]),
			FrameColumn::float8("age", [31.0, 45.0, 27.0]),
		])
		.unwrap();
		let spec = TransformSpec::parse(r#"{"recode": ["city"]}"#).unwrap();

		let (matrix, meta) = encode(&frame, &spec).unwrap();
		assert_eq!(decode(&matrix, &spec, &meta).unwrap(), frame);
	}

	#[test]
	fn test_unknown_codes_are_missing() {
		let meta = FrameBlock::new(vec![FrameColumn::text("c", ["a\u{00b7}1"])]).unwrap();
		let spec = TransformSpec::parse(r#"{"recode": ["c"]}"#).unwrap();
		let matrix = MatrixBlock::column(vec![1.0, 2.0, f64::NAN, 0.5]);

		let frame = decode(&matrix, &spec, &meta).unwrap();
		assert_eq!(frame[0].data, FrameData::Text(vec![Some("a".to_string()), None, None, None]));
	}

	#[test]
	fn test_column_count_mismatch() {
		let meta = FrameBlock::new(vec![FrameColumn::text("c", ["a\u{00b7}1"])]).unwrap();
		let err = decode(&MatrixBlock::zeros(1, 2).unwrap(), &TransformSpec::default(), &meta).unwrap_err();
		assert!(matches!(err, Error::ShapeMismatch { .. }));
	}
}
