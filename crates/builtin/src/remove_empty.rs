// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tabula_type::{Error, MatrixBlock, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
	Rows,
	Cols,
}

impl Margin {
	pub fn from_name(name: &str) -> Result<Self> {
		match name {
			"rows" => Ok(Margin::Rows),
			"cols" => Ok(Margin::Cols),
			_ => Err(Error::InvalidMargin {
				margin: name.to_string(),
			}),
		}
	}
}

impl Display for Margin {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Margin::Rows => f.write_str("rows"),
			Margin::Cols => f.write_str("cols"),
		}
	}
}

/// Drops all-zero rows or columns, or keeps exactly the positions where `select` is non-zero.
///
/// When nothing is kept the result is a single zero row (or column), never an empty matrix.
pub fn remove_empty(target: &MatrixBlock, margin: Margin, select: Option<&MatrixBlock>) -> Result<MatrixBlock> {
	let (rows, cols) = target.shape();
	let extent = match margin {
		Margin::Rows => rows,
		Margin::Cols => cols,
	};

	let keep: Vec<usize> = match select {
		Some(select) => {
			let expected = match margin {
				Margin::Rows => (rows, 1),
				Margin::Cols => (1, cols),
			};
			if select.shape() != expected {
				return Err(Error::shape_mismatch(expected, select.shape()));
			}
			(0..extent).filter(|&i| select.values()[i] != 0.0).collect()
		}
		None => match margin {
			Margin::Rows => (0..rows).filter(|&r| target.row(r).iter().any(|&v| v != 0.0)).collect(),
			Margin::Cols => (0..cols).filter(|&c| (0..rows).any(|r| target.get(r, c) != 0.0)).collect(),
		},
	};

	match (margin, keep.is_empty()) {
		(Margin::Rows, true) => MatrixBlock::zeros(1, cols),
		(Margin::Cols, true) => MatrixBlock::zeros(rows, 1),
		(Margin::Rows, false) => MatrixBlock::from_fn(keep.len(), cols, |r, c| target.get(keep[r], c)),
		(Margin::Cols, false) => MatrixBlock::from_fn(rows, keep.len(), |r, c| target.get(r, keep[c])),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> MatrixBlock {
		MatrixBlock::from_rows(&[[1.0, 0.0, 2.0], [0.0, 0.0, 0.0], [3.0, 0.0, 4.0]]).unwrap()
	}

	#[test]
	fn test_margin() {
		assert_eq!(Margin::from_name("rows").unwrap(), Margin::Rows);
		assert!(matches!(Margin::from_name("diag"), Err(Error::InvalidMargin { margin }) if margin == "diag"));
		assert!(Margin::from_name("ROWS").is_err());
	}

	#[test]
	fn test_rows() {
		let out = remove_empty(&sample(), Margin::Rows, None).unwrap();
		assert_eq!(out, MatrixBlock::from_rows(&[[1.0, 0.0, 2.0], [3.0, 0.0, 4.0]]).unwrap());
	}

	#[test]
	fn test_cols() {
		let out = remove_empty(&sample(), Margin::Cols, None).unwrap();
		assert_eq!(out, MatrixBlock::from_rows(&[[1.0, 2.0], [0.0, 0.0], [3.0, 4.0]]).unwrap());
	}

	#[test]
	fn test_select() {
		let select = MatrixBlock::column(vec![0.0, 1.0, 0.0]);
		let out = remove_empty(&sample(), Margin::Rows, Some(&select)).unwrap();
		assert_eq!(out, MatrixBlock::zeros(1, 3).unwrap());

		let select = MatrixBlock::row_vector(vec![0.0, 0.0, 1.0]);
		let out = remove_empty(&sample(), Margin::Cols, Some(&select)).unwrap();
		assert_eq!(out, MatrixBlock::column(vec![2.0, 0.0, 4.0]));
	}

	#[test]
	fn test_select_shape() {
		let select = MatrixBlock::row_vector(vec![1.0, 1.0, 1.0]);
		assert!(matches!(remove_empty(&sample(), Margin::Rows, Some(&select)), Err(Error::ShapeMismatch { .. })));
	}

	#[test]
	fn test_all_empty() {
		let zeros = MatrixBlock::zeros(2, 3).unwrap();
		assert_eq!(remove_empty(&zeros, Margin::Rows, None).unwrap(), MatrixBlock::zeros(1, 3).unwrap());
		assert_eq!(remove_empty(&zeros, Margin::Cols, None).unwrap(), MatrixBlock::zeros(2, 1).unwrap());
	}
}
