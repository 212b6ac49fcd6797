// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Recode transforms between frames and matrices.
//!
//! `encode` derives recode maps from a frame and returns both the encoded
//! matrix and a metadata frame describing the maps. `apply` and `decode`
//! reuse such a metadata frame, and `meta` moves it to and from disk.

mod decode;
mod encode;
pub mod meta;
mod recode;
mod spec;

pub use decode::decode;
pub use encode::{apply, encode};
pub use meta::{read_meta, write_meta};
pub use recode::RecodeMap;
pub use spec::{ColumnRef, TransformSpec};

/// Separates a token from its code inside a metadata frame cell.
pub const RECODE_DELIM: char = '\u{00b7}';

/// Default separator of on-disk transform metadata.
pub const TXMTD_SEP: &str = ",";
