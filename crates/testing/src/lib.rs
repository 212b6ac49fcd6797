// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod tempdir;
pub mod testscript;

pub use tempdir::temp_dir;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber filtered by `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}
