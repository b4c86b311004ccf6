//! Parser for two-operand instruction text.
//!
//! Syntax (case-insensitive, surrounding whitespace ignored):
//! ```text
//! ADD R1,R2
//! sub r1 , r2
//! MOV R1,  R2
//! ```
//!
//! The mnemonic is one or more letters, followed by at least one space,
//! then two alphanumeric operands separated by a comma. Mnemonics outside
//! the supported set still parse; they simply run the fetch phase only.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Opcodes the ALU knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    /// R1 := R1 + R2
    Add,
    /// R1 := R1 - R2
    Sub,
    /// R1 := R1 * R2
    Mul,
    /// R1 := R2
    Mov,
}

impl Opcode {
    /// All supported opcodes.
    pub const ALL: [Opcode; 4] = [Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Mov];

    /// Look up an upper-case mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "ADD" => Some(Opcode::Add),
            "SUB" => Some(Opcode::Sub),
            "MUL" => Some(Opcode::Mul),
            "MOV" => Some(Opcode::Mov),
            _ => None,
        }
    }

    /// The mnemonic as written in source.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Mov => "MOV",
        }
    }

    /// Whether the instruction routes through the ALU (as opposed to a move).
    pub fn uses_alu(self) -> bool {
        !matches!(self, Opcode::Mov)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A syntactically valid instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInstruction {
    /// Upper-case mnemonic, supported or not.
    pub mnemonic: String,
    /// Destination operand name.
    pub dst: String,
    /// Source operand name.
    pub src: String,
}

impl ParsedInstruction {
    /// The opcode, if the mnemonic is one the ALU supports.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_mnemonic(&self.mnemonic)
    }

    /// Whether the operands name the R1/R2 pair the datapath is wired for.
    pub fn is_register_pair(&self) -> bool {
        self.dst == "R1" && self.src == "R2"
    }
}

impl fmt::Display for ParsedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {},{}", self.mnemonic, self.dst, self.src)
    }
}

impl FromStr for ParsedInstruction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instruction(s)
    }
}

/// Parse instruction text like `"ADD R1,R2"`.
pub fn parse_instruction(text: &str) -> Result<ParsedInstruction, ParseError> {
    let text = text.trim().to_uppercase();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut cursor = Cursor::new(&text);

    let mnemonic = cursor.take_while(|c| c.is_ascii_alphabetic());
    if mnemonic.is_empty() {
        return Err(cursor.malformed("expected mnemonic"));
    }

    if cursor.skip_whitespace() == 0 {
        return Err(cursor.malformed("expected whitespace after mnemonic"));
    }

    let dst = cursor.take_while(|c| c.is_ascii_alphanumeric());
    if dst.is_empty() {
        return Err(cursor.malformed("expected destination operand"));
    }

    cursor.skip_whitespace();
    if !cursor.eat(',') {
        return Err(cursor.malformed("expected ','"));
    }
    cursor.skip_whitespace();

    let src = cursor.take_while(|c| c.is_ascii_alphanumeric());
    if src.is_empty() {
        return Err(cursor.malformed("expected source operand"));
    }

    if !cursor.at_end() {
        return Err(cursor.malformed("unexpected trailing text"));
    }

    Ok(ParsedInstruction {
        mnemonic: mnemonic.to_string(),
        dst: dst.to_string(),
        src: src.to_string(),
    })
}

/// Byte-position cursor over the upper-cased text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) -> usize {
        self.take_while(char::is_whitespace).len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn malformed(&self, message: &str) -> ParseError {
        ParseError::Malformed {
            column: self.text[..self.pos].chars().count() + 1,
            message: message.to_string(),
        }
    }
}

/// Errors that can occur while parsing instruction text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty instruction")]
    Empty,

    #[error("malformed instruction at column {column}: {message}")]
    Malformed { column: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed() {
        let instr = parse_instruction("ADD R1,R2").unwrap();
        assert_eq!(instr.mnemonic, "ADD");
        assert_eq!(instr.dst, "R1");
        assert_eq!(instr.src, "R2");
        assert_eq!(instr.opcode(), Some(Opcode::Add));
        assert!(instr.is_register_pair());
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_spacing() {
        for text in ["add r1,r2", "  ADD   R1 , R2  ", "Add R1,\tR2", "ADD\tR1 ,R2"] {
            let instr = parse_instruction(text).unwrap();
            assert_eq!(instr.to_string(), "ADD R1,R2", "input {:?}", text);
        }
    }

    #[test]
    fn test_parse_unsupported_mnemonic() {
        let instr = parse_instruction("DIV R1,R2").unwrap();
        assert_eq!(instr.mnemonic, "DIV");
        assert_eq!(instr.opcode(), None);
    }

    #[test]
    fn test_parse_other_operands() {
        let instr = parse_instruction("MOV A0,7").unwrap();
        assert_eq!(instr.opcode(), Some(Opcode::Mov));
        assert!(!instr.is_register_pair());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bad = [
            "",
            "   ",
            "ADD",
            "ADD R1",
            "ADD R1 R2",
            "ADD R1,R2,R3",
            "ADDR1,R2",
            "ADD R1,",
            "ADD ,R2",
            "AD1 R1,R2",
            "ADD R-1,R2",
            "ADD R1,R2;",
            "1ADD R1,R2",
        ];
        for text in bad {
            assert!(parse_instruction(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn test_error_column() {
        let err = parse_instruction("ADD R1 R2").unwrap_err();
        assert_eq!(
            err,
            ParseError::Malformed { column: 8, message: "expected ','".into() }
        );
    }

    #[test]
    fn test_opcode_mnemonic_lookup() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert!(Opcode::Add.uses_alu());
        assert!(!Opcode::Mov.uses_alu());
    }
}
