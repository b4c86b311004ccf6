//! 16-bit register values.
//!
//! This module provides the value type shown in the register boxes:
//! - [`Word16`] - A 16-bit word, entered and displayed as hexadecimal
//! - [`HexValue`] - A register input as typed, before masking
//! - [`arith`] - The masked ALU operations (ADD, SUB, MUL, MOV)

mod word;
pub mod arith;

pub use word::{Word16, HexValue, HexError};
pub use arith::{add, subtract, multiply, mov};
