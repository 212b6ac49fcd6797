// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, marker::PhantomData};

use tabula_type::{Error, Result};

/// Values a parameter can be parsed into.
pub trait ParamValue: Sized {
	const EXPECTED: &'static str;

	fn parse_param(raw: &str) -> Option<Self>;
}

impl ParamValue for f64 {
	const EXPECTED: &'static str = "a number";

	fn parse_param(raw: &str) -> Option<Self> {
		raw.trim().parse().ok()
	}
}

impl ParamValue for usize {
	const EXPECTED: &'static str = "a non-negative integer";

	fn parse_param(raw: &str) -> Option<Self> {
		let raw = raw.trim();
		if let Ok(value) = raw.parse() {
			return Some(value);
		}
		// integral doubles such as "2.0" are accepted
		let value: f64 = raw.parse().ok()?;
		(value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64).then_some(value as usize)
	}
}

impl ParamValue for bool {
	const EXPECTED: &'static str = "true or false";

	fn parse_param(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"true" => Some(true),
			"false" => Some(false),
			_ => None,
		}
	}
}

/// A raw parameter string, parsed into `T` only when the instruction executes.
pub struct Param<T> {
	key: String,
	raw: String,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Param<T> {
	pub fn new(key: &str, raw: &str) -> Self {
		Self {
			key: key.to_string(),
			raw: raw.to_string(),
			_marker: PhantomData,
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}
}

impl<T: ParamValue> Param<T> {
	pub fn get(&self) -> Result<T> {
		T::parse_param(&self.raw)
			.ok_or_else(|| Error::invalid_parameter(&self.key, &self.raw, format!("expected {}", T::EXPECTED)))
	}
}

impl<T> Clone for Param<T> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			raw: self.raw.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> PartialEq for Param<T> {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key && self.raw == other.raw
	}
}

impl<T> fmt::Debug for Param<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}={:?}", self.key, self.raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_numbers() {
		assert_eq!(Param::<f64>::new("pattern", "-1.5").get().unwrap(), -1.5);
		assert!(Param::<f64>::new("pattern", "NaN").get().unwrap().is_nan());
		assert_eq!(Param::<usize>::new("k", "4").get().unwrap(), 4);
		assert_eq!(Param::<usize>::new("k", "2.0").get().unwrap(), 2);
	}

	#[test]
	fn test_booleans() {
		assert!(Param::<bool>::new("cast", "TRUE").get().unwrap());
		assert!(!Param::<bool>::new("cast", "false").get().unwrap());
	}

	#[test]
	fn test_invalid() {
		for (key, raw) in [("max", "ten"), ("max", ""), ("k", "-1"), ("k", "1.5")] {
			let err = Param::<usize>::new(key, raw).get().unwrap_err();
			assert!(
				matches!(&err, Error::InvalidParameterValue { parameter, value, .. } if parameter == key && value == raw),
				"{err}"
			);
		}
		assert!(Param::<bool>::new("sparse", "yes").get().is_err());
	}
}
