// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// What an operand refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
	Matrix,
	Frame,
	Scalar,
}

impl Display for ValueKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ValueKind::Matrix => f.write_str("matrix"),
			ValueKind::Frame => f.write_str("frame"),
			ValueKind::Scalar => f.write_str("scalar"),
		}
	}
}

impl FromStr for ValueKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"matrix" => Ok(ValueKind::Matrix),
			"frame" => Ok(ValueKind::Frame),
			"scalar" => Ok(ValueKind::Scalar),
			_ => Err(()),
		}
	}
}

/// The kinds of data the buffer pool manages. Scalars never live there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheableKind {
	Matrix,
	Frame,
}

impl CacheableKind {
	pub fn value_kind(&self) -> ValueKind {
		match self {
			CacheableKind::Matrix => ValueKind::Matrix,
			CacheableKind::Frame => ValueKind::Frame,
		}
	}
}

impl Display for CacheableKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.value_kind(), f)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
	Float8,
	Int8,
	Bool,
	Text,
}

impl Display for ElementType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ElementType::Float8 => f.write_str("DOUBLE"),
			ElementType::Int8 => f.write_str("INT"),
			ElementType::Bool => f.write_str("BOOLEAN"),
			ElementType::Text => f.write_str("STRING"),
		}
	}
}

impl FromStr for ElementType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"double" | "f64" | "fp64" => Ok(ElementType::Float8),
			"int" | "i64" | "int64" => Ok(ElementType::Int8),
			"boolean" | "bool" => Ok(ElementType::Bool),
			"string" | "text" | "str" => Ok(ElementType::Text),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
	Float8(f64),
	Int8(i64),
	Bool(bool),
	Text(String),
}

impl ScalarValue {
	pub fn element_type(&self) -> ElementType {
		match self {
			ScalarValue::Float8(_) => ElementType::Float8,
			ScalarValue::Int8(_) => ElementType::Int8,
			ScalarValue::Bool(_) => ElementType::Bool,
			ScalarValue::Text(_) => ElementType::Text,
		}
	}

	/// Numeric view of the value; text parses, booleans map to 1/0.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			ScalarValue::Float8(v) => Some(*v),
			ScalarValue::Int8(v) => Some(*v as f64),
			ScalarValue::Bool(v) => Some(if *v {
				1.0
			} else {
				0.0
			}),
			ScalarValue::Text(v) => v.trim().parse().ok(),
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			ScalarValue::Text(v) => Some(v),
			_ => None,
		}
	}

	/// Parses a literal of the given element type.
	pub fn parse(literal: &str, element: ElementType) -> Option<Self> {
		match element {
			ElementType::Float8 => literal.parse().ok().map(ScalarValue::Float8),
			ElementType::Int8 => literal.parse().ok().map(ScalarValue::Int8),
			ElementType::Bool => match literal.to_ascii_lowercase().as_str() {
				"true" => Some(ScalarValue::Bool(true)),
				"false" => Some(ScalarValue::Bool(false)),
				_ => None,
			},
			ElementType::Text => Some(ScalarValue::Text(literal.to_string())),
		}
	}
}

impl Display for ScalarValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ScalarValue::Float8(v) => Display::fmt(v, f),
			ScalarValue::Int8(v) => Display::fmt(v, f),
			ScalarValue::Bool(v) => Display::fmt(v, f),
			ScalarValue::Text(v) => f.write_str(v),
		}
	}
}

impl From<f64> for ScalarValue {
	fn from(value: f64) -> Self {
		ScalarValue::Float8(value)
	}
}

impl From<i64> for ScalarValue {
	fn from(value: i64) -> Self {
		ScalarValue::Int8(value)
	}
}

impl From<bool> for ScalarValue {
	fn from(value: bool) -> Self {
		ScalarValue::Bool(value)
	}
}

impl From<String> for ScalarValue {
	fn from(value: String) -> Self {
		ScalarValue::Text(value)
	}
}

impl From<&str> for ScalarValue {
	fn from(value: &str) -> Self {
		ScalarValue::Text(value.to_string())
	}
}
