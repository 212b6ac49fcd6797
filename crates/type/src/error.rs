// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use crate::value::{CacheableKind, ValueKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Fieldless mirror of [`Error`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	MalformedInstruction,
	UnknownOpcode,
	MissingParameter,
	InvalidParameterValue,
	UnresolvedVariable,
	UnbalancedRelease,
	ShapeMismatch,
	InvalidMargin,
	UnsupportedCacheableKind,
	InvalidBlockValue,
	StorageFailure,
	BudgetExceeded,
	Transform,
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
	pub rows: usize,
	pub cols: usize,
}

impl Display for Shape {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}", self.rows, self.cols)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("malformed instruction '{instruction}': {reason}")]
	MalformedInstruction {
		instruction: String,
		reason: String,
	},

	#[error("unknown opcode '{opcode}'")]
	UnknownOpcode {
		opcode: String,
	},

	#[error("{opcode}: mandatory parameter '{parameter}' is missing")]
	MissingParameter {
		opcode: String,
		parameter: String,
	},

	#[error("invalid value '{value}' for parameter '{parameter}': {reason}")]
	InvalidParameterValue {
		parameter: String,
		value: String,
		reason: String,
	},

	#[error("variable '{name}' is not bound")]
	UnresolvedVariable {
		name: String,
	},

	#[error("release of '{name}' without an outstanding pin")]
	UnbalancedRelease {
		name: String,
	},

	#[error("shape mismatch: {left} vs {right}")]
	ShapeMismatch {
		left: Shape,
		right: Shape,
	},

	#[error("unsupported margin identifier '{margin}'")]
	InvalidMargin {
		margin: String,
	},

	#[error("variable '{name}' is a {actual}, expected {expected}")]
	UnsupportedCacheableKind {
		name: String,
		expected: String,
		actual: ValueKind,
	},

	#[error("invalid block value: {reason}")]
	InvalidBlockValue {
		reason: String,
	},

	#[error("storage failure for '{name}': {reason}")]
	StorageFailure {
		name: String,
		reason: String,
	},

	#[error("'{name}' needs {size} bytes, more than the whole budget of {budget} bytes")]
	BudgetExceeded {
		name: String,
		size: usize,
		budget: usize,
	},

	#[error("transform failed: {reason}")]
	Transform {
		reason: String,
	},
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::MalformedInstruction {
				..
			} => ErrorKind::MalformedInstruction,
			Error::UnknownOpcode {
				..
			} => ErrorKind::UnknownOpcode,
			Error::MissingParameter {
				..
			} => ErrorKind::MissingParameter,
			Error::InvalidParameterValue {
				..
			} => ErrorKind::InvalidParameterValue,
			Error::UnresolvedVariable {
				..
			} => ErrorKind::UnresolvedVariable,
			Error::UnbalancedRelease {
				..
			} => ErrorKind::UnbalancedRelease,
			Error::ShapeMismatch {
				..
			} => ErrorKind::ShapeMismatch,
			Error::InvalidMargin {
				..
			} => ErrorKind::InvalidMargin,
			Error::UnsupportedCacheableKind {
				..
			} => ErrorKind::UnsupportedCacheableKind,
			Error::InvalidBlockValue {
				..
			} => ErrorKind::InvalidBlockValue,
			Error::StorageFailure {
				..
			} => ErrorKind::StorageFailure,
			Error::BudgetExceeded {
				..
			} => ErrorKind::BudgetExceeded,
			Error::Transform {
				..
			} => ErrorKind::Transform,
		}
	}

	/// Resource-layer faults abort the whole run and are never retried.
	pub fn is_fatal(&self) -> bool {
		matches!(self.kind(), ErrorKind::StorageFailure | ErrorKind::BudgetExceeded)
	}

	pub fn malformed(instruction: impl Into<String>, reason: impl Into<String>) -> Self {
		Error::MalformedInstruction {
			instruction: instruction.into(),
			reason: reason.into(),
		}
	}

	pub fn missing_parameter(opcode: impl Into<String>, parameter: impl Into<String>) -> Self {
		Error::MissingParameter {
			opcode: opcode.into(),
			parameter: parameter.into(),
		}
	}

	pub fn invalid_parameter(
		parameter: impl Into<String>,
		value: impl Into<String>,
		reason: impl Into<String>,
	) -> Self {
		Error::InvalidParameterValue {
			parameter: parameter.into(),
			value: value.into(),
			reason: reason.into(),
		}
	}

	pub fn unresolved(name: impl Into<String>) -> Self {
		Error::UnresolvedVariable {
			name: name.into(),
		}
	}

	pub fn shape_mismatch(left: (usize, usize), right: (usize, usize)) -> Self {
		Error::ShapeMismatch {
			left: Shape {
				rows: left.0,
				cols: left.1,
			},
			right: Shape {
				rows: right.0,
				cols: right.1,
			},
		}
	}

	pub fn invalid_block(reason: impl Into<String>) -> Self {
		Error::InvalidBlockValue {
			reason: reason.into(),
		}
	}

	pub fn storage(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Error::StorageFailure {
			name: name.into(),
			reason: reason.into(),
		}
	}

	pub fn unsupported_kind(name: impl Into<String>, expected: CacheableKind, actual: ValueKind) -> Self {
		Error::UnsupportedCacheableKind {
			name: name.into(),
			expected: expected.to_string(),
			actual,
		}
	}

	pub fn budget_exceeded(name: impl Into<String>, size: usize, budget: usize) -> Self {
		Error::BudgetExceeded {
			name: name.into(),
			size,
			budget,
		}
	}

	pub fn transform(reason: impl Into<String>) -> Self {
		Error::Transform {
			reason: reason.into(),
		}
	}
}
