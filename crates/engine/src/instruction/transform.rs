// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The format-transform family. None of these bind an operator; the
//! behavior is driven entirely by the JSON transform spec.

use std::path::PathBuf;

use tabula_builtin::transform::{self, TXMTD_SEP, TransformSpec};
use tabula_type::{FrameBlock, FrameColumn, FrameData, Result};

use super::descriptor::Descriptor;
use crate::ExecutionContext;

/// `transform`: encodes a frame into a matrix, optionally persisting the derived metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformInstruction {
	pub target: String,
	pub spec: String,
	pub metadata_dir: Option<PathBuf>,
	pub separator: String,
	pub output: String,
}

impl TransformInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			spec: params.required("spec")?.to_string(),
			metadata_dir: params.optional("tfmtd").map(PathBuf::from),
			separator: params.optional("sep").unwrap_or(TXMTD_SEP).to_string(),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let spec = TransformSpec::parse(&self.spec)?;
		let (matrix, meta) = {
			let frame = ctx.pin_frame(&self.target)?;
			transform::encode(&frame, &spec)?
		};
		if let Some(dir) = &self.metadata_dir {
			transform::write_meta(dir, &meta, &self.separator)?;
		}
		ctx.set_matrix_output(&self.output, matrix)
	}
}

/// `transformapply`: encodes a frame with recode maps from an existing metadata frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformApplyInstruction {
	pub target: String,
	pub spec: String,
	pub meta: String,
	pub output: String,
}

impl TransformApplyInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			spec: params.required("spec")?.to_string(),
			meta: params.required("meta")?.to_string(),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let spec = TransformSpec::parse(&self.spec)?;
		let matrix = {
			let frame = ctx.pin_frame(&self.target)?;
			let meta = ctx.pin_frame(&self.meta)?;
			transform::apply(&frame, &spec, &meta)?
		};
		ctx.set_matrix_output(&self.output, matrix)
	}
}

/// `transformdecode`: maps an encoded matrix back to a frame of tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformDecodeInstruction {
	pub target: String,
	pub spec: String,
	pub meta: String,
	pub output: String,
}

impl TransformDecodeInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			target: params.required("target")?.to_string(),
			spec: params.required("spec")?.to_string(),
			meta: params.required("meta")?.to_string(),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let spec = TransformSpec::parse(&self.spec)?;
		let frame = {
			let matrix = ctx.pin_matrix(&self.target)?;
			let meta = ctx.pin_frame(&self.meta)?;
			transform::decode(&matrix, &spec, &meta)?
		};
		ctx.set_frame_output(&self.output, frame)
	}
}

/// `transformmeta`: reads persisted metadata, keeping maps only for the columns the transform spec recodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformMetaInstruction {
	pub spec: String,
	pub metadata_dir: PathBuf,
	pub separator: String,
	pub output: String,
}

impl TransformMetaInstruction {
	pub(crate) fn parse(descriptor: &Descriptor<'_>) -> Result<Self> {
		let params = descriptor.parameters()?;
		Ok(Self {
			spec: params.required("spec")?.to_string(),
			metadata_dir: PathBuf::from(params.required("tfmtd")?),
			separator: params.optional("sep").unwrap_or(TXMTD_SEP).to_string(),
			output: descriptor.output_name()?,
		})
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		let spec = TransformSpec::parse(&self.spec)?;
		let meta = transform::read_meta(&self.metadata_dir, &self.separator)?;
		let recoded = spec.recoded_columns(&meta.names())?;

		let rows = meta.row_count();
		let columns = meta
			.into_columns()
			.into_iter()
			.zip(recoded)
			.map(|(column, recode)| match recode {
				true => column,
				false => FrameColumn::new(column.name, FrameData::Text(vec![None; rows])),
			})
			.collect();
		ctx.set_frame_output(&self.output, FrameBlock::new(columns)?)
	}
}
