//! ALU operations on 16-bit words.
//!
//! Every result is masked to 16 bits, so SUB wraps below zero and MUL
//! keeps only the low half of the product.

use crate::word::Word16;

/// ADD: `(a + b) & 0xFFFF`
#[inline]
pub fn add(a: Word16, b: Word16) -> Word16 {
    Word16::new(a.value().wrapping_add(b.value()))
}

/// SUB: `(a - b) & 0xFFFF`
#[inline]
pub fn subtract(a: Word16, b: Word16) -> Word16 {
    Word16::new(a.value().wrapping_sub(b.value()))
}

/// MUL: low 16 bits of `a * b`
#[inline]
pub fn multiply(a: Word16, b: Word16) -> Word16 {
    Word16::new(a.value().wrapping_mul(b.value()))
}

/// MOV: the source operand, unchanged.
#[inline]
pub fn mov(src: Word16) -> Word16 {
    Word16::from_masked(u32::from(src.value()))
}
