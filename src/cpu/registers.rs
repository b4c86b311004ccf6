//! The R1/R2 register pair.
//!
//! Each register has two faces: the hex text the user typed, and the value
//! shown inside its box in the diagram. They drift apart while an
//! instruction runs (the box shows what was loaded) and are brought back
//! together on reset or when a result is written back.

use serde::{Serialize, Deserialize};
use crate::word::{HexError, HexValue, Word16};

/// One register's input text and displayed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterField {
    /// Hex text as entered.
    pub input: String,
    /// Text currently shown in the diagram box.
    pub shown: String,
}

impl RegisterField {
    /// Create a field whose box mirrors the input.
    pub fn new(input: impl Into<String>) -> Self {
        let mut field = Self { input: input.into(), shown: String::new() };
        field.sync_shown();
        field
    }

    /// Copy the (trimmed, upper-cased) input into the box.
    pub fn sync_shown(&mut self) {
        self.shown = self.input.trim().to_uppercase();
    }

    /// Read the input as hex.
    pub fn value(&self) -> Result<HexValue, HexError> {
        HexValue::parse(&self.input)
    }

    /// Write a result back into both the input and the box.
    pub fn commit(&mut self, value: Word16) {
        let text = value.to_padded_hex();
        self.input = text.clone();
        self.shown = text;
    }
}

/// The register pair every instruction operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// R1: first operand and destination.
    pub r1: RegisterField,
    /// R2: second operand / source.
    pub r2: RegisterField,
}

impl Registers {
    pub fn new(r1: impl Into<String>, r2: impl Into<String>) -> Self {
        Self { r1: RegisterField::new(r1), r2: RegisterField::new(r2) }
    }

    /// Refresh both boxes from their inputs.
    pub fn sync_shown(&mut self) {
        self.r1.sync_shown();
        self.r2.sync_shown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mirrors_input() {
        let regs = Registers::new(" a ", "1f");
        assert_eq!(regs.r1.shown, "A");
        assert_eq!(regs.r2.shown, "1F");
        assert_eq!(regs.r1.input, " a ");
    }

    #[test]
    fn test_commit_pads_and_updates_both() {
        let mut field = RegisterField::new("3");
        field.commit(Word16::new(0xF));
        assert_eq!(field.input, "0F");
        assert_eq!(field.shown, "0F");
        assert_eq!(field.value().unwrap().word(), Word16::new(0xF));
    }

    #[test]
    fn test_value_reports_bad_hex() {
        assert!(RegisterField::new("zz").value().is_err());
        assert!(RegisterField::new("").value().is_err());
    }

    #[test]
    fn test_value_keeps_what_was_typed() {
        assert_eq!(RegisterField::new("1g").value().unwrap().value(), 1);
        assert_eq!(RegisterField::new("12345").value().unwrap().to_hex(), "12345");
    }
}
