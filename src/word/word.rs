//! The 16-bit register word.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A 16-bit register value.
///
/// Every value held by the datapath is already in range: whatever the
/// register input reads as is masked to its low 16 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word16(u16);

impl Word16 {
    /// Mask applied to every ALU result.
    pub const MASK: u32 = 0xFFFF;

    /// The zero word.
    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create from a raw `u16`.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Create from any integer, keeping the low 16 bits.
    #[inline]
    pub const fn from_masked(value: u32) -> Self {
        Self((value & Self::MASK) as u16)
    }

    /// The raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Parse hexadecimal text like `"1f"`, `"0x00FF"` or `" A "` and keep
    /// the low 16 bits. See [`HexValue::parse`] for what is accepted.
    pub fn parse_hex(text: &str) -> Result<Self, HexError> {
        HexValue::parse(text).map(HexValue::word)
    }

    /// Upper-case hex without padding (`A`, `1F`, `0`).
    pub fn to_hex(self) -> String {
        format!("{:X}", self.0)
    }

    /// Upper-case hex padded to at least two digits (`0A`, `1F`, `1234`).
    pub fn to_padded_hex(self) -> String {
        format!("{:02X}", self.0)
    }
}

impl fmt::Debug for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word16(0x{:04X})", self.0)
    }
}

impl fmt::Display for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::UpperHex for Word16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl FromStr for Word16 {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<u16> for Word16 {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Word16> for u16 {
    fn from(word: Word16) -> Self {
        word.0
    }
}

/// A register input as typed.
///
/// Reading is lenient: surrounding whitespace, one leading sign and a
/// `0x`/`0X` prefix are skipped, then hex digits are taken up to the first
/// character that is not one. `"1G"` reads as 1 and `"-5"` as -5. The full
/// value is kept so step messages show what was entered; the datapath
/// works on [`HexValue::word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexValue(i64);

impl HexValue {
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Read the leading hex number of `text`.
    pub fn parse(text: &str) -> Result<Self, HexError> {
        let text = text.trim();
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let digits = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest);

        let mut magnitude: i64 = 0;
        let mut read = 0usize;
        for c in digits.chars() {
            let Some(digit) = c.to_digit(16) else { break };
            magnitude = magnitude
                .checked_mul(16)
                .and_then(|m| m.checked_add(i64::from(digit)))
                .ok_or(HexError::TooLarge)?;
            read += 1;
        }

        if read == 0 {
            return Err(match digits.chars().next() {
                Some(c) => HexError::InvalidDigit(c),
                None => HexError::Empty,
            });
        }

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// The low 16 bits, two's complement for negative values.
    pub fn word(self) -> Word16 {
        Word16::from_masked((self.0 & i64::from(Word16::MASK)) as u32)
    }

    /// Upper-case hex with a leading `-` for negative values (`-5`, `12345`).
    pub fn to_hex(self) -> String {
        if self.0 < 0 {
            format!("-{:X}", self.0.unsigned_abs())
        } else {
            format!("{:X}", self.0)
        }
    }
}

impl fmt::Display for HexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Word16> for HexValue {
    fn from(word: Word16) -> Self {
        Self(i64::from(word.0))
    }
}

impl From<u16> for HexValue {
    fn from(value: u16) -> Self {
        Self(i64::from(value))
    }
}

/// Errors from parsing hexadecimal register text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("empty hex value")]
    Empty,

    #[error("invalid hex digit: {0:?}")]
    InvalidDigit(char),

    #[error("hex value too large")]
    TooLarge,
}
