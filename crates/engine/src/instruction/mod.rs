// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Instruction construction and dispatch.
//!
//! [`Instruction::parse`] turns one descriptor into a typed instruction,
//! failing fast on structural errors and missing mandatory parameters.
//! Numeric and boolean parameters stay as text until `execute`.

mod binary;
pub mod descriptor;
mod distribution;
mod grouped;
pub mod opcode;
pub mod operand;
pub mod param;
mod remove_empty;
mod replace;
mod rexpand;
mod rmvar;
mod stringify;
mod transform;
mod unary;

use std::str::FromStr;

pub use binary::BinaryInstruction;
pub use descriptor::{Descriptor, OPERAND_DELIM, Parameters};
pub use distribution::DistributionInstruction;
pub use grouped::GroupedAggregateInstruction;
pub use opcode::Opcode;
pub use operand::Operand;
pub use param::{Param, ParamValue};
pub use remove_empty::RemoveEmptyInstruction;
pub use replace::ReplaceInstruction;
pub use rexpand::RexpandInstruction;
pub use rmvar::RemoveVariableInstruction;
pub use stringify::StringifyInstruction;
use tabula_operator::{BinaryOperator, Operator, SimpleFn, SimpleOperator, UnaryOperator};
use tabula_type::{Error, Result};
use tracing::{debug, instrument};
pub use transform::{
	TransformApplyInstruction, TransformDecodeInstruction, TransformInstruction, TransformMetaInstruction,
};
pub use unary::UnaryInstruction;

use crate::ExecutionContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Binary(BinaryInstruction),
	Unary(UnaryInstruction),
	Cdf(DistributionInstruction),
	InvCdf(DistributionInstruction),
	GroupedAggregate(GroupedAggregateInstruction),
	RemoveEmpty(RemoveEmptyInstruction),
	Replace(ReplaceInstruction),
	Rexpand(RexpandInstruction),
	Transform(TransformInstruction),
	TransformApply(TransformApplyInstruction),
	TransformDecode(TransformDecodeInstruction),
	TransformMeta(TransformMetaInstruction),
	ToString(StringifyInstruction),
	RemoveVariable(RemoveVariableInstruction),
}

impl Instruction {
	#[instrument(name = "engine::instruction::parse", level = "trace")]
	pub fn parse(text: &str) -> Result<Self> {
		let descriptor = Descriptor::tokenize(text)?;
		let opcode: Opcode = descriptor.opcode.parse()?;

		let instruction = match opcode {
			Opcode::Binary(function) => {
				Instruction::Binary(BinaryInstruction::parse(&descriptor, BinaryOperator::new(function))?)
			}
			Opcode::Unary(function) => {
				Instruction::Unary(UnaryInstruction::parse(&descriptor, UnaryOperator::new(function))?)
			}
			Opcode::Cdf => Instruction::Cdf(DistributionInstruction::parse(&descriptor, false)?),
			Opcode::InvCdf => Instruction::InvCdf(DistributionInstruction::parse(&descriptor, true)?),
			Opcode::GroupedAggregate => {
				Instruction::GroupedAggregate(GroupedAggregateInstruction::parse(&descriptor)?)
			}
			Opcode::RemoveEmpty => Instruction::RemoveEmpty(RemoveEmptyInstruction::parse(&descriptor)?),
			Opcode::Replace => Instruction::Replace(ReplaceInstruction::parse(&descriptor)?),
			Opcode::Rexpand => Instruction::Rexpand(RexpandInstruction::parse(&descriptor)?),
			Opcode::Transform => Instruction::Transform(TransformInstruction::parse(&descriptor)?),
			Opcode::TransformApply => Instruction::TransformApply(TransformApplyInstruction::parse(&descriptor)?),
			Opcode::TransformDecode => {
				Instruction::TransformDecode(TransformDecodeInstruction::parse(&descriptor)?)
			}
			Opcode::TransformMeta => Instruction::TransformMeta(TransformMetaInstruction::parse(&descriptor)?),
			Opcode::ToString => Instruction::ToString(StringifyInstruction::parse(&descriptor)?),
			Opcode::RemoveVariable => Instruction::RemoveVariable(RemoveVariableInstruction::parse(&descriptor)?),
		};

		debug!(opcode = %opcode, "instruction parsed");
		Ok(instruction)
	}

	pub fn opcode(&self) -> Opcode {
		match self {
			Instruction::Binary(i) => Opcode::Binary(i.operator.function),
			Instruction::Unary(i) => Opcode::Unary(i.operator.function),
			Instruction::Cdf(_) => Opcode::Cdf,
			Instruction::InvCdf(_) => Opcode::InvCdf,
			Instruction::GroupedAggregate(_) => Opcode::GroupedAggregate,
			Instruction::RemoveEmpty(_) => Opcode::RemoveEmpty,
			Instruction::Replace(_) => Opcode::Replace,
			Instruction::Rexpand(_) => Opcode::Rexpand,
			Instruction::Transform(_) => Opcode::Transform,
			Instruction::TransformApply(_) => Opcode::TransformApply,
			Instruction::TransformDecode(_) => Opcode::TransformDecode,
			Instruction::TransformMeta(_) => Opcode::TransformMeta,
			Instruction::ToString(_) => Opcode::ToString,
			Instruction::RemoveVariable(_) => Opcode::RemoveVariable,
		}
	}

	/// The operator bound at construction, if this opcode has one.
	pub fn operator(&self) -> Option<Operator> {
		match self {
			Instruction::Binary(i) => Some(Operator::Binary(i.operator)),
			Instruction::Unary(i) => Some(Operator::Unary(i.operator)),
			Instruction::Cdf(i) | Instruction::InvCdf(i) => Some(Operator::Simple(i.operator)),
			Instruction::GroupedAggregate(i) => Some(simple(SimpleFn::GroupedAggregate(i.function))),
			Instruction::RemoveEmpty(_) => Some(simple(SimpleFn::RemoveEmpty)),
			Instruction::Replace(_) => Some(simple(SimpleFn::Replace)),
			Instruction::Rexpand(_) => Some(simple(SimpleFn::Rexpand)),
			Instruction::Transform(_)
			| Instruction::TransformApply(_)
			| Instruction::TransformDecode(_)
			| Instruction::TransformMeta(_)
			| Instruction::ToString(_)
			| Instruction::RemoveVariable(_) => None,
		}
	}

	/// Runs the instruction against `ctx`. Every pin taken here is released before returning.
	#[instrument(name = "engine::instruction::execute", level = "debug", skip(self, ctx), fields(opcode = %self.opcode()))]
	pub fn execute(&self, ctx: &ExecutionContext) -> Result<()> {
		match self {
			Instruction::Binary(i) => i.execute(ctx),
			Instruction::Unary(i) => i.execute(ctx),
			Instruction::Cdf(i) | Instruction::InvCdf(i) => i.execute(ctx),
			Instruction::GroupedAggregate(i) => i.execute(ctx),
			Instruction::RemoveEmpty(i) => i.execute(ctx),
			Instruction::Replace(i) => i.execute(ctx),
			Instruction::Rexpand(i) => i.execute(ctx),
			Instruction::Transform(i) => i.execute(ctx),
			Instruction::TransformApply(i) => i.execute(ctx),
			Instruction::TransformDecode(i) => i.execute(ctx),
			Instruction::TransformMeta(i) => i.execute(ctx),
			Instruction::ToString(i) => i.execute(ctx),
			Instruction::RemoveVariable(i) => i.execute(ctx),
		}
	}
}

fn simple(function: SimpleFn) -> Operator {
	Operator::Simple(SimpleOperator::new(function))
}

impl FromStr for Instruction {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Instruction::parse(s)
	}
}
