// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{error::Error, fmt};

/// One command line of a script.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
	pub name: String,
	pub args: Vec<String>,
	/// Everything after the command name, untouched.
	pub raw: String,
	/// The command was prefixed with `!` and is expected to fail.
	pub fail: bool,
	pub line: usize,
}

impl Command {
	pub(crate) fn parse(line: usize, text: &str) -> Option<Self> {
		let text = text.trim();
		let (fail, text) = match text.strip_prefix('!') {
			Some(rest) => (true, rest.trim_start()),
			None => (false, text),
		};
		let (name, raw) = match text.split_once(char::is_whitespace) {
			Some((name, rest)) => (name, rest.trim()),
			None => (text, ""),
		};
		if name.is_empty() {
			return None;
		}
		Some(Self {
			name: name.to_string(),
			args: raw.split_whitespace().map(str::to_string).collect(),
			raw: raw.to_string(),
			fail,
			line,
		})
	}

	/// Positional argument `index`, or an error naming the command.
	pub fn arg(&self, index: usize) -> Result<&str, Box<dyn Error>> {
		self.args
			.get(index)
			.map(String::as_str)
			.ok_or_else(|| format!("{}: missing argument {}", self.name, index + 1).into())
	}

	/// The raw text following the first `skip` arguments.
	pub fn rest(&self, skip: usize) -> &str {
		let mut rest = self.raw.as_str();
		for _ in 0..skip {
			rest = rest.trim_start();
			rest = rest.find(char::is_whitespace).map_or("", |i| &rest[i..]);
		}
		rest.trim()
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.fail {
			f.write_str("!")?;
		}
		if self.raw.is_empty() {
			f.write_str(&self.name)
		} else {
			write!(f, "{} {}", self.name, self.raw)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse() {
		let cmd = Command::parse(3, "  exec  replace target=A out=B ").unwrap();
		assert_eq!(cmd.name, "exec");
		assert_eq!(cmd.args, vec!["replace", "target=A", "out=B"]);
		assert_eq!(cmd.raw, "replace target=A out=B");
		assert!(!cmd.fail);
		assert_eq!(cmd.line, 3);
	}

	#[test]
	fn test_parse_fail_prefix() {
		let cmd = Command::parse(1, "!exec bogus").unwrap();
		assert!(cmd.fail);
		assert_eq!(cmd.name, "exec");
		assert_eq!(cmd.to_string(), "!exec bogus");
	}

	#[test]
	fn test_rest() {
		let cmd = Command::parse(1, "matrix A [[1, 2], [3, 4]]").unwrap();
		assert_eq!(cmd.rest(1), "[[1, 2], [3, 4]]");
		assert_eq!(cmd.rest(0), "A [[1, 2], [3, 4]]");
		assert_eq!(cmd.rest(5), "");
	}
}
