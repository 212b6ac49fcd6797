// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{error::Error, fmt::Write, path::Path};

use serde_json::Value;
use tabula_engine::{ExecutionContext, Instruction, Program};
use tabula_testing::testscript::{self, Command};
use tabula_type::{Block, FrameBlock, FrameColumn, FrameData, MatrixBlock, ScalarValue};
use test_each_file::test_each_path;

/// Drives an execution context from script commands:
///
/// - `matrix NAME [[1, 2], [3, 4]]` binds a matrix
/// - `frame NAME [["city", "age"], ["rome", 1], [null, 2]]` binds a frame; the first row holds column names
/// - `scalar NAME VALUE` binds a numeric, boolean or text scalar
/// - `exec DESCRIPTOR` parses and executes one instruction
/// - `program` runs the `;`-separated descriptors that follow
/// - `print NAME` renders a variable
/// - `pins` reports the outstanding pin count
pub struct Runner {
	ctx: ExecutionContext,
}

impl Runner {
	pub fn new() -> Self {
		Self {
			ctx: ExecutionContext::default(),
		}
	}
}

impl testscript::Runner for Runner {
	fn run(&mut self, command: &Command) -> Result<String, Box<dyn Error>> {
		let mut output = String::new();
		match command.name.as_str() {
			"matrix" => {
				let rows: Vec<Vec<f64>> = serde_json::from_str(command.rest(1))?;
				self.ctx.set_matrix_output(command.arg(0)?, MatrixBlock::from_rows(&rows)?)?;
			}
			"frame" => {
				let rows: Vec<Vec<Value>> = serde_json::from_str(command.rest(1))?;
				self.ctx.set_frame_output(command.arg(0)?, parse_frame(rows)?)?;
			}
			"scalar" => {
				let raw = command.rest(1);
				let value = if let Ok(number) = raw.parse::<f64>() {
					ScalarValue::Float8(number)
				} else if let Ok(flag) = raw.parse::<bool>() {
					ScalarValue::Bool(flag)
				} else {
					ScalarValue::Text(raw.to_string())
				};
				self.ctx.set_scalar(command.arg(0)?, value)?;
			}
			"exec" => {
				Instruction::parse(&command.raw)?.execute(&self.ctx)?;
			}
			"program" => {
				let text = command.raw.split(';').collect::<Vec<_>>().join("\n");
				Program::parse(&text)?.execute(&self.ctx)?;
			}
			"print" => {
				let name = command.arg(0)?;
				if let Ok(scalar) = self.ctx.scalar(name) {
					for line in scalar.to_string().lines() {
						writeln!(output, "{}", line.trim_end())?;
					}
				} else {
					let pin = self.ctx.pin(name)?;
					match pin.block() {
						Block::Matrix(matrix) => print_matrix(&mut output, matrix)?,
						Block::Frame(frame) => print_frame(&mut output, frame)?,
					}
				}
			}
			"pins" => {
				writeln!(output, "pins: {}", self.ctx.total_pins())?;
			}
			name => return Err(format!("invalid command {name}").into()),
		}
		Ok(output)
	}
}

fn parse_frame(rows: Vec<Vec<Value>>) -> Result<FrameBlock, Box<dyn Error>> {
	let mut rows = rows.into_iter();
	let header = rows.next().ok_or("frame needs a header row")?;
	let body: Vec<Vec<Value>> = rows.collect();

	let mut columns = Vec::with_capacity(header.len());
	for (c, name) in header.iter().enumerate() {
		let name = name.as_str().ok_or("column names must be strings")?;
		let cells: Vec<&Value> = body.iter().map(|row| row.get(c).unwrap_or(&Value::Null)).collect();
		let data = if cells.iter().all(|v| v.is_null() || v.is_number()) {
			FrameData::Float8(cells.iter().map(|v| v.as_f64()).collect())
		} else {
			FrameData::Text(
				cells.iter()
					.map(|v| match v {
						Value::Null => None,
						Value::String(s) => Some(s.clone()),
						other => Some(other.to_string()),
					})
					.collect(),
			)
		};
		columns.push(FrameColumn::new(name, data));
	}
	Ok(FrameBlock::new(columns)?)
}

fn print_matrix(output: &mut String, matrix: &MatrixBlock) -> std::fmt::Result {
	for r in 0..matrix.rows() {
		let row: Vec<String> = matrix.row(r).iter().map(f64::to_string).collect();
		writeln!(output, "{}", row.join(" "))?;
	}
	Ok(())
}

fn print_frame(output: &mut String, frame: &FrameBlock) -> std::fmt::Result {
	writeln!(output, "{}", frame.names().join(" "))?;
	for r in 0..frame.row_count() {
		let row: Vec<String> = (0..frame.column_count())
			.map(|c| frame.get(r, c).map_or_else(|| "NULL".to_string(), |v| v.to_string()))
			.collect();
		writeln!(output, "{}", row.join(" "))?;
	}
	Ok(())
}

test_each_path! { in "crates/engine/tests/scripts" as scripts => run_test }

fn run_test(path: &Path) {
	tabula_testing::init_tracing();
	testscript::run_path(&mut Runner::new(), path).expect("test failed")
}
