// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use tabula_type::{FrameBlock, FrameData, MatrixBlock};

/// Rendering options of the `tostring` builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifyOptions {
	pub rows: usize,
	pub cols: usize,
	pub decimal: usize,
	pub sparse: bool,
	pub separator: String,
	pub line_separator: String,
}

impl Default for StringifyOptions {
	fn default() -> Self {
		Self {
			rows: 100,
			cols: 100,
			decimal: 3,
			sparse: false,
			separator: " ".to_string(),
			line_separator: "\n".to_string(),
		}
	}
}

pub fn matrix_to_string(matrix: &MatrixBlock, options: &StringifyOptions) -> String {
	let rows = matrix.rows().min(options.rows);
	let cols = matrix.cols().min(options.cols);
	let decimal = options.decimal;
	let sep = &options.separator;
	let mut out = String::new();

	if options.sparse {
		for r in 0..rows {
			for c in 0..cols {
				let value = matrix.get(r, c);
				if value != 0.0 {
					let _ = write!(out, "{}{sep}{}{sep}{value:.decimal$}{}", r + 1, c + 1, options.line_separator);
				}
			}
		}
		return out;
	}

	for r in 0..rows {
		for c in 0..cols {
			let _ = write!(out, "{:.decimal$}{sep}", matrix.get(r, c));
		}
		out.push_str(&options.line_separator);
	}
	out
}

pub fn frame_to_string(frame: &FrameBlock, options: &StringifyOptions) -> String {
	let rows = frame.row_count().min(options.rows);
	let columns = &frame.columns()[..frame.column_count().min(options.cols)];
	let decimal = options.decimal;
	let sep = &options.separator;
	let mut out = String::from("# ");

	for column in columns {
		out.push_str(&column.name);
		out.push_str(sep);
	}
	out.push_str(&options.line_separator);

	for r in 0..rows {
		for column in columns {
			let _ = match &column.data {
				FrameData::Float8(v) => match v[r] {
					Some(value) => write!(out, "{value:.decimal$}{sep}"),
					None => write!(out, "NULL{sep}"),
				},
				FrameData::Int8(v) => match v[r] {
					Some(value) => write!(out, "{value}{sep}"),
					None => write!(out, "NULL{sep}"),
				},
				FrameData::Bool(v) => match v[r] {
					Some(value) => write!(out, "{value}{sep}"),
					None => write!(out, "NULL{sep}"),
				},
				FrameData::Text(v) => match &v[r] {
					Some(value) => write!(out, "{value}{sep}"),
					None => write!(out, "NULL{sep}"),
				},
			};
		}
		out.push_str(&options.line_separator);
	}
	out
}

#[cfg(test)]
mod tests {
	use tabula_type::FrameColumn;

	use super::*;

	fn sample() -> MatrixBlock {
		MatrixBlock::from_rows(&[[1.0, 0.0, 2.5], [0.0, 0.0, 0.0], [-3.0, 0.25, 0.0]]).unwrap()
	}

	#[test]
	fn test_dense_defaults() {
		let out = matrix_to_string(&sample(), &StringifyOptions::default());
		assert_eq!(out, "1.000 0.000 2.500 \n0.000 0.000 0.000 \n-3.000 0.250 0.000 \n");
	}

	#[test]
	fn test_caps_and_precision() {
		let options = StringifyOptions {
			rows: 1,
			cols: 2,
			decimal: 1,
			separator: ",".to_string(),
			line_separator: ";".to_string(),
			..Default::default()
		};
		assert_eq!(matrix_to_string(&sample(), &options), "1.0,0.0,;");
	}

	#[test]
	fn test_sparse() {
		let options = StringifyOptions {
			sparse: true,
			decimal: 2,
			..Default::default()
		};
		assert_eq!(matrix_to_string(&sample(), &options), "1 1 1.00\n1 3 2.50\n3 1 -3.00\n3 2 0.25\n");
	}

	#[test]
	fn test_frame() {
		let frame = FrameBlock::new(vec![
			FrameColumn::text("name", ["a", "b"]),
			FrameColumn::new("score", FrameData::Float8(vec![Some(1.5), None])),
			FrameColumn::new("n", FrameData::Int8(vec![Some(7), Some(-1)])),
		])
		.unwrap();
		let out = frame_to_string(&frame, &StringifyOptions::default());
		assert_eq!(out, "# name score n \na 1.500 7 \nb NULL -1 \n");
	}

	#[test]
	fn test_empty() {
		assert_eq!(matrix_to_string(&MatrixBlock::zeros(0, 3).unwrap(), &StringifyOptions::default()), "");
		assert_eq!(frame_to_string(&FrameBlock::empty(), &StringifyOptions::default()), "# \n");
	}
}
