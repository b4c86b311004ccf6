//! Instruction text parsing.
//!
//! This module provides:
//! - The supported opcode set (ADD, SUB, MUL, MOV)
//! - A parser for the two-operand form `OPCODE DST,SRC`

pub mod parser;

pub use parser::{parse_instruction, Opcode, ParsedInstruction, ParseError};
