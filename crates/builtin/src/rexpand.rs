// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use tabula_type::{Error, MatrixBlock, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Rows,
	Cols,
}

impl Direction {
	pub fn from_name(name: &str) -> Result<Self> {
		match name {
			"rows" => Ok(Direction::Rows),
			"cols" => Ok(Direction::Cols),
			_ => Err(Error::invalid_parameter("dir", name, "expected rows or cols")),
		}
	}
}

impl Display for Direction {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Direction::Rows => f.write_str("rows"),
			Direction::Cols => f.write_str("cols"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rexpand {
	pub max: usize,
	pub direction: Direction,
	/// Floor fractional values instead of rejecting them.
	pub cast: bool,
	/// Skip values outside `1..=max` instead of rejecting them.
	pub ignore: bool,
}

impl Rexpand {
	/// Output shape for an input vector of `len` values.
	pub fn output_shape(&self, len: usize) -> (usize, usize) {
		match self.direction {
			Direction::Cols => (len, self.max),
			Direction::Rows => (self.max, len),
		}
	}
}

/// Expands a vector of category values into an indicator matrix with one 1 per (position, value).
pub fn rexpand(target: &MatrixBlock, config: &Rexpand) -> Result<MatrixBlock> {
	if !target.is_vector() {
		return Err(Error::invalid_block(format!(
			"rexpand expects a row or column vector, got {}x{}",
			target.rows(),
			target.cols()
		)));
	}

	let values = target.values();
	let (rows, cols) = config.output_shape(values.len());
	let mut out = MatrixBlock::zeros(rows, cols)?;

	for (position, &raw) in values.iter().enumerate() {
		let value = if raw.fract() != 0.0 && raw.is_finite() {
			if !config.cast {
				return Err(Error::invalid_block(format!("rexpand value {raw} at {position} is not an integer")));
			}
			raw.floor()
		} else {
			raw
		};

		if !(value >= 1.0 && value <= config.max as f64) {
			if config.ignore {
				continue;
			}
			return Err(Error::invalid_block(format!(
				"rexpand value {raw} at {position} outside 1..={}",
				config.max
			)));
		}

		let index = value as usize - 1;
		match config.direction {
			Direction::Cols => out.set(position, index, 1.0),
			Direction::Rows => out.set(index, position, 1.0),
		}
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(max: usize, direction: Direction) -> Rexpand {
		Rexpand {
			max,
			direction,
			cast: true,
			ignore: true,
		}
	}

	#[test]
	fn test_cols() {
		let v = MatrixBlock::column(vec![2.0, 1.0, 3.0]);
		let out = rexpand(&v, &config(3, Direction::Cols)).unwrap();
		assert_eq!(
			out,
			MatrixBlock::from_rows(&[[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap()
		);
	}

	#[test]
	fn test_rows() {
		let v = MatrixBlock::row_vector(vec![2.0, 1.0]);
		let out = rexpand(&v, &config(3, Direction::Rows)).unwrap();
		assert_eq!(out, MatrixBlock::from_rows(&[[0.0, 1.0], [1.0, 0.0], [0.0, 0.0]]).unwrap());
	}

	#[test]
	fn test_cast_and_ignore() {
		let v = MatrixBlock::column(vec![1.7, 5.0, 0.0, f64::NAN]);
		let out = rexpand(&v, &config(2, Direction::Cols)).unwrap();
		assert_eq!(out, MatrixBlock::from_rows(&[[1.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]).unwrap());
	}

	#[test]
	fn test_strict() {
		let strict = Rexpand {
			cast: false,
			ignore: false,
			..config(2, Direction::Cols)
		};
		assert!(matches!(
			rexpand(&MatrixBlock::column(vec![1.5]), &strict),
			Err(Error::InvalidBlockValue { .. })
		));
		assert!(matches!(
			rexpand(&MatrixBlock::column(vec![3.0]), &strict),
			Err(Error::InvalidBlockValue { .. })
		));
		assert!(rexpand(&MatrixBlock::column(vec![2.0]), &strict).is_ok());
	}

	#[test]
	fn test_unaddressable_output() {
		let v = MatrixBlock::column(vec![1.0, 2.0, 3.0]);
		let huge = config(10_000_000_000_000_000_000, Direction::Cols);
		assert_eq!(huge.output_shape(3), (3, 10_000_000_000_000_000_000));
		assert!(matches!(rexpand(&v, &huge), Err(Error::InvalidBlockValue { .. })));
	}

	#[test]
	fn test_requires_vector() {
		assert!(rexpand(&MatrixBlock::zeros(2, 2).unwrap(), &config(2, Direction::Cols)).is_err());
	}

	#[test]
	fn test_direction() {
		assert_eq!(Direction::from_name("cols").unwrap(), Direction::Cols);
		assert!(matches!(Direction::from_name("diag"), Err(Error::InvalidParameterValue { .. })));
	}
}
