// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tabula_type::MatrixBlock;

/// Replaces every cell equal to `pattern` with `replacement`. A NaN pattern matches NaN cells.
pub fn replace(target: &MatrixBlock, pattern: f64, replacement: f64) -> MatrixBlock {
	if pattern.is_nan() {
		target.map(|v| if v.is_nan() { replacement } else { v })
	} else {
		target.map(|v| if v == pattern { replacement } else { v })
	}
}
