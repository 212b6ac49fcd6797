// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_builtin::{StringifyOptions, frame_to_string, matrix_to_string};
use tabula_type::{Block, Result, ScalarValue};

use super::{descriptor::Descriptor, param::Param};
use crate::ExecutionContext;

/// `tostring`: renders a matrix or frame as text.
#[derive(Debug, Clone, PartialEq)]
pub struct StringifyInstruction {
	pub target: String,
	pub rows: Param<usize>,
	pub cols: Param<usize>,
	pub decimal: Param<usize>,
	pub sparse: Param<bool>,
	pub separator: String,
	pub line_separator: String,
	pub output: String,
}

impl StringifyInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			rows: params.param_or("rows", "100"),
			cols: params.param_or("cols", "100"),
			decimal: params.param_or("decimal", "3"),
			sparse: params.param_or("sparse", "false"),
			separator: params.optional("sep").map_or_else(|| " ".to_string(), unescape),
			line_separator: params.optional("linesep").map_or_else(|| "\n".to_string(), unescape),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let options = StringifyOptions {
			rows: self.rows.get()?,
			cols: self.cols.get()?,
			decimal: self.decimal.get()?,
			sparse: self.sparse.get()?,
			separator: self.separator.clone(),
			line_separator: self.line_separator.clone(),
		};

		let text = {
			let pin = ctx.pin(&self.target)?;
			match pin.block() {
				Block::Matrix(matrix) => matrix_to_string(matrix, &options),
				Block::Frame(frame) => frame_to_string(frame, &options),
			}
		};
		ctx.set_scalar(&self.output, ScalarValue::Text(text))
	}
}

/// Descriptor tokens cannot carry raw control characters, so `\n`, `\t` and `\\` arrive escaped.
fn unescape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => out.push('\\'),
		}
	}
	out
}
