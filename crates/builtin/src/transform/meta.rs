// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! On-disk transform metadata.
//!
//! A metadata directory holds `column.names`, the column names joined by the
//! separator, and one `Recode/<name>.map` file per recoded column with a
//! `token<sep>code` line per token.

use std::{fmt::Write as _, fs, io, path::Path};

use tabula_type::{Error, FrameBlock, FrameColumn, FrameData, Result};
use tracing::{debug, instrument};

use super::{RECODE_DELIM, RecodeMap};

pub const COLUMN_NAMES_FILE: &str = "column.names";
pub const RECODE_DIR: &str = "Recode";
pub const MAP_SUFFIX: &str = ".map";

fn io_error(path: &Path, e: io::Error) -> Error {
	Error::transform(format!("{}: {e}", path.display()))
}

/// Writes a metadata frame as produced by `encode`. Columns without entries get no map file.
#[instrument(name = "builtin::transform::write_meta", level = "debug", skip(meta))]
pub fn write_meta(dir: &Path, meta: &FrameBlock, sep: &str) -> Result<()> {
	let recode_dir = dir.join(RECODE_DIR);
	fs::create_dir_all(&recode_dir).map_err(|e| io_error(&recode_dir, e))?;

	let names_path = dir.join(COLUMN_NAMES_FILE);
	fs::write(&names_path, meta.names().join(sep)).map_err(|e| io_error(&names_path, e))?;

	for column in meta.columns() {
		let map = RecodeMap::from_meta(&column.name, &column.data)?;
		if map.is_empty() {
			continue;
		}

		let mut contents = String::new();
		for (token, code) in map.iter() {
			let _ = writeln!(contents, "{token}{sep}{code}");
		}
		let path = recode_dir.join(format!("{}{MAP_SUFFIX}", column.name));
		fs::write(&path, contents).map_err(|e| io_error(&path, e))?;
	}

	debug!(columns = meta.column_count(), "transform metadata written");
	Ok(())
}

/// Reads a metadata directory back into a metadata frame with one text column per data column.
#[instrument(name = "builtin::transform::read_meta", level = "debug")]
pub fn read_meta(dir: &Path, sep: &str) -> Result<FrameBlock> {
	let names_path = dir.join(COLUMN_NAMES_FILE);
	let names = fs::read_to_string(&names_path).map_err(|e| io_error(&names_path, e))?;
	let names: Vec<&str> = names.trim_end_matches(['\r', '\n']).split(sep).map(str::trim).collect();

	let mut cells = Vec::with_capacity(names.len());
	for name in &names {
		let path = dir.join(RECODE_DIR).join(format!("{name}{MAP_SUFFIX}"));
		let contents = match fs::read_to_string(&path) {
			Ok(contents) => contents,
			Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
			Err(e) => return Err(io_error(&path, e)),
		};

		let mut entries = Vec::new();
		for line in contents.lines().filter(|l| !l.trim().is_empty()) {
			let (token, code) = line
				.rsplit_once(sep)
				.ok_or_else(|| Error::transform(format!("{}: malformed line '{line}'", path.display())))?;
			entries.push(Some(format!("{token}{RECODE_DELIM}{}", code.trim())));
		}
		cells.push(entries);
	}

	let rows = cells.iter().map(Vec::len).max().unwrap_or(0);
	let columns = names
		.iter()
		.zip(cells)
		.map(|(name, mut entries)| {
			entries.resize(rows, None);
			FrameColumn::new(*name, FrameData::Text(entries))
		})
		.collect();
	let meta = FrameBlock::new(columns)?;

	// validates codes eagerly so a corrupt map fails here rather than at apply time
	for column in meta.columns() {
		RecodeMap::from_meta(&column.name, &column.data)?;
	}
	Ok(meta)
}
