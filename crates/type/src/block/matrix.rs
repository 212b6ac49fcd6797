// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Dense, row-major block of doubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixBlock {
	rows: usize,
	cols: usize,
	values: Vec<f64>,
}

impl MatrixBlock {
	pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
		let len = Self::checked_len(rows, cols)?;
		Ok(Self {
			rows,
			cols,
			values: vec![0.0; len],
		})
	}

	/// Bytes a `rows x cols` block occupies once built, or `None` when no allocation could hold it.
	pub fn size_for(rows: usize, cols: usize) -> Option<usize> {
		let bytes = rows.checked_mul(cols)?.checked_mul(size_of::<f64>())?;
		if bytes > isize::MAX as usize {
			return None;
		}
		bytes.checked_add(size_of::<Self>())
	}

	fn checked_len(rows: usize, cols: usize) -> Result<usize> {
		match Self::size_for(rows, cols) {
			Some(_) => Ok(rows * cols),
			None => Err(Error::invalid_block(format!("a {rows}x{cols} block does not fit in memory"))),
		}
	}

	pub fn from_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
		if values.len() != rows * cols {
			return Err(Error::shape_mismatch((rows, cols), (values.len(), 1)));
		}
		Ok(Self {
			rows,
			cols,
			values,
		})
	}

	pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
		let cols = rows.first().map_or(0, |r| r.as_ref().len());
		let mut values = Vec::with_capacity(rows.len() * cols);
		for row in rows {
			let row = row.as_ref();
			if row.len() != cols {
				return Err(Error::shape_mismatch((rows.len(), cols), (1, row.len())));
			}
			values.extend_from_slice(row);
		}
		Ok(Self {
			rows: rows.len(),
			cols,
			values,
		})
	}

	pub fn column(values: Vec<f64>) -> Self {
		Self {
			rows: values.len(),
			cols: 1,
			values,
		}
	}

	pub fn row_vector(values: Vec<f64>) -> Self {
		Self {
			rows: 1,
			cols: values.len(),
			values,
		}
	}

	pub fn scalar(value: f64) -> Self {
		Self {
			rows: 1,
			cols: 1,
			values: vec![value],
		}
	}

	#[inline]
	pub fn rows(&self) -> usize {
		self.rows
	}

	#[inline]
	pub fn cols(&self) -> usize {
		self.cols
	}

	#[inline]
	pub fn shape(&self) -> (usize, usize) {
		(self.rows, self.cols)
	}

	#[inline]
	pub fn get(&self, row: usize, col: usize) -> f64 {
		self.values[row * self.cols + col]
	}

	#[inline]
	pub fn set(&mut self, row: usize, col: usize, value: f64) {
		self.values[row * self.cols + col] = value;
	}

	pub fn row(&self, row: usize) -> &[f64] {
		&self.values[row * self.cols..(row + 1) * self.cols]
	}

	pub fn values(&self) -> &[f64] {
		&self.values
	}

	pub fn values_mut(&mut self) -> &mut [f64] {
		&mut self.values
	}

	pub fn into_values(self) -> Vec<f64> {
		self.values
	}

	pub fn is_vector(&self) -> bool {
		self.rows == 1 || self.cols == 1
	}

	/// A 1x1 block broadcasts like a scalar.
	pub fn is_scalar_equivalent(&self) -> bool {
		self.rows == 1 && self.cols == 1
	}

	pub fn nnz(&self) -> usize {
		self.values.iter().filter(|v| **v != 0.0).count()
	}

	pub fn size_in_bytes(&self) -> usize {
		size_of::<Self>() + self.values.len() * size_of::<f64>()
	}

	/// Builds a block of the given shape by evaluating `f` at every cell.
	pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Result<Self> {
		let mut values = Vec::with_capacity(Self::checked_len(rows, cols)?);
		for r in 0..rows {
			for c in 0..cols {
				values.push(f(r, c));
			}
		}
		Ok(Self {
			rows,
			cols,
			values,
		})
	}

	pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
		Self {
			rows: self.rows,
			cols: self.cols,
			values: self.values.iter().map(|v| f(*v)).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ErrorKind;

	#[test]
	fn test_from_rows() {
		let m = MatrixBlock::from_rows(&[[0.0, 1.0], [0.0, 2.0]]).unwrap();
		assert_eq!(m.shape(), (2, 2));
		assert_eq!(m.get(1, 1), 2.0);
		assert_eq!(m.row(0), &[0.0, 1.0]);
		assert_eq!(m.nnz(), 2);
	}

	#[test]
	fn test_from_rows_ragged() {
		let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
		let err = MatrixBlock::from_rows(&rows).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
	}

	#[test]
	fn test_from_vec_wrong_length() {
		let err = MatrixBlock::from_vec(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
	}

	#[test]
	fn test_scalar_equivalent() {
		assert!(MatrixBlock::scalar(4.0).is_scalar_equivalent());
		assert!(!MatrixBlock::column(vec![1.0, 2.0]).is_scalar_equivalent());
		assert!(MatrixBlock::column(vec![1.0, 2.0]).is_vector());
	}

	#[test]
	fn test_size_grows_with_cells() {
		let small = MatrixBlock::zeros(1, 1).unwrap();
		let large = MatrixBlock::zeros(10, 10).unwrap();
		assert_eq!(large.size_in_bytes() - small.size_in_bytes(), 99 * 8);
		assert_eq!(MatrixBlock::size_for(10, 10), Some(large.size_in_bytes()));
	}

	#[test]
	fn test_overflowing_shape() {
		let rows = 10_000_000_000_000_000_000usize;
		assert_eq!(MatrixBlock::size_for(rows, 3), None);

		let err = MatrixBlock::zeros(rows, 3).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidBlockValue);

		let err = MatrixBlock::from_fn(3, rows, |_, _| 1.0).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidBlockValue);
	}
}
