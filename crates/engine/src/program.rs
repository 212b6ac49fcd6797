// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::str::FromStr;

use thiserror::Error;
use tracing::{error, instrument};

use crate::{ExecutionContext, Instruction};

/// An error raised by one line of a program.
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct ProgramError {
	/// 1-based line of the failing instruction.
	pub line: usize,
	#[source]
	pub source: tabula_type::Error,
}

/// An ordered sequence of instructions, one descriptor per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
	instructions: Vec<(usize, Instruction)>,
}

impl Program {
	/// Parses every non-blank, non-comment line. The first bad line aborts the whole program.
	#[instrument(name = "engine::program::parse", level = "debug", skip(text))]
	pub fn parse(text: &str) -> Result<Self, ProgramError> {
		let mut instructions = Vec::new();
		for (index, line) in text.lines().enumerate() {
			let trimmed = line.trim();
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			let instruction = Instruction::parse(trimmed).map_err(|source| ProgramError {
				line: index + 1,
				source,
			})?;
			instructions.push((index + 1, instruction));
		}
		Ok(Self {
			instructions,
		})
	}

	pub fn len(&self) -> usize {
		self.instructions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.instructions.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
		self.instructions.iter().map(|(_, instruction)| instruction)
	}

	/// Runs each instruction in order, stopping at the first failure.
	#[instrument(name = "engine::program::execute", level = "debug", skip_all, fields(instructions = self.len()))]
	pub fn execute(&self, ctx: &ExecutionContext) -> Result<(), ProgramError> {
		for (line, instruction) in &self.instructions {
			if let Err(source) = instruction.execute(ctx) {
				error!(line, error = %source, fatal = source.is_fatal(), "program aborted");
				return Err(ProgramError {
					line: *line,
					source,
				});
			}
		}
		Ok(())
	}
}

impl FromStr for Program {
	type Err = ProgramError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Program::parse(s)
	}
}
