// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Golden-output script tests.
//!
//! A script is a sequence of blocks. Each block holds one or more command
//! lines, a `---` separator, and the expected output, terminated by a blank
//! line or the end of the file. Lines starting with `#` outside of expected
//! output are comments. A command prefixed with `!` must fail; its output is
//! the error message prefixed with `Error: `.
//!
//! ```text
//! matrix A [[0, 1], [0, 2]]
//! exec replace target=A pattern=0 replacement=-1 out=B
//! print B
//! ---
//! -1 1
//! -1 2
//! ```

mod command;

use std::{error::Error, fs, io, path::Path};

pub use command::Command;

pub trait Runner {
	fn run(&mut self, command: &Command) -> Result<String, Box<dyn Error>>;
}

#[derive(Debug)]
struct Block {
	line: usize,
	commands: Vec<Command>,
	expected: String,
}

pub fn run_path<R: Runner>(runner: &mut R, path: &Path) -> io::Result<()> {
	let script = fs::read_to_string(path)?;
	run(runner, &script).map_err(|e| io::Error::other(format!("{}: {e}", path.display())))
}

pub fn run<R: Runner>(runner: &mut R, script: &str) -> io::Result<()> {
	for block in parse(script)? {
		let mut output = String::new();
		for command in &block.commands {
			match (runner.run(command), command.fail) {
				(Ok(out), false) => output.push_str(&out),
				(Err(e), true) => {
					output.push_str(&format!("Error: {e}"));
					output.push('\n');
				}
				(Ok(out), true) => {
					return Err(io::Error::other(format!(
						"line {}: expected '{command}' to fail, got:\n{out}",
						command.line
					)));
				}
				(Err(e), false) => {
					return Err(io::Error::other(format!("line {}: '{command}' failed: {e}", command.line)));
				}
			}
		}

		let actual = output.trim_end_matches('\n');
		if actual != block.expected {
			return Err(io::Error::other(format!(
				"block at line {} mismatch\n--- expected\n{}\n--- actual\n{}",
				block.line, block.expected, actual
			)));
		}
	}
	Ok(())
}

fn parse(script: &str) -> io::Result<Vec<Block>> {
	let mut blocks = Vec::new();
	let mut lines = script.lines().enumerate().map(|(i, l)| (i + 1, l)).peekable();

	while let Some(&(start, _)) = lines.peek() {
		let mut commands = Vec::new();
		let mut separated = false;

		for (number, line) in lines.by_ref() {
			let trimmed = line.trim();
			if trimmed == "---" {
				separated = true;
				break;
			}
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			if let Some(command) = Command::parse(number, trimmed) {
				commands.push(command);
			}
		}

		if !separated {
			if commands.is_empty() {
				break;
			}
			return Err(io::Error::new(
				io::ErrorKind::InvalidData,
				format!("block at line {start} has no '---' separator"),
			));
		}

		let mut expected = Vec::new();
		for (_, line) in lines.by_ref() {
			if line.trim().is_empty() {
				break;
			}
			expected.push(line.trim_end());
		}

		blocks.push(Block {
			line: commands.first().map_or(start, |c| c.line),
			commands,
			expected: expected.join("\n"),
		});
	}

	Ok(blocks)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Echo;

	impl Runner for Echo {
		fn run(&mut self, command: &Command) -> Result<String, Box<dyn Error>> {
			match command.name.as_str() {
				"echo" => Ok(format!("{}\n", command.raw)),
				"silent" => Ok(String::new()),
				_ => Err(format!("unknown command {}", command.name).into()),
			}
		}
	}

	#[test]
	fn test_matching_blocks() {
		let script = "# leading comment\necho a\nsilent\necho b\n---\na\nb\n\n!nope\n---\nError: unknown command nope\n";
		run(&mut Echo, script).unwrap();
	}

	#[test]
	fn test_mismatch_reports_line() {
		let err = run(&mut Echo, "\n\necho a\n---\nb\n").unwrap_err();
		assert!(err.to_string().contains("line 3"), "{err}");
	}

	#[test]
	fn test_unexpected_success() {
		assert!(run(&mut Echo, "!echo a\n---\n").is_err());
	}

	#[test]
	fn test_missing_separator() {
		assert!(run(&mut Echo, "echo a\n").is_err());
	}

	#[test]
	fn test_empty_script() {
		run(&mut Echo, "\n# nothing\n").unwrap();
	}
}
