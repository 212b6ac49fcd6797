// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Execution core of tabula.
//!
//! A [`Program`] is a sequence of textual instruction descriptors. Each line
//! is parsed into a typed [`Instruction`] up front, then executed against an
//! [`ExecutionContext`], which owns the variable bindings and the buffer pool
//! holding every matrix and frame.
//!
//! ```ignore
//! let ctx = ExecutionContext::default();
//! ctx.set_matrix_output("A", MatrixBlock::from_rows(&[[0.0, 1.0], [0.0, 2.0]])?)?;
//!
//! Program::parse("replace target=A pattern=0 replacement=-1 out=B")?.execute(&ctx)?;
//! assert_eq!(ctx.pin_matrix("B")?.get(0, 0), -1.0);
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod context;
pub mod instruction;
pub mod program;

pub use context::{ContextConfig, ExecutionContext, FramePin, MatrixPin};
pub use instruction::{Instruction, Opcode};
pub use program::{Program, ProgramError};
pub use tabula_type::{Error, ErrorKind, Result};
