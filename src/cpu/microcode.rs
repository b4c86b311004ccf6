//! Micro-step sequences.
//!
//! Every instruction starts with the same fetch phase, then runs an
//! execute phase that depends on the opcode:
//!
//! ```text
//! fetch:   PC → MAR → MDR → IR
//! ALU op:  R1 → Y → ALU ← R2,  ALU → Z → R1
//! MOV:     R2 → MDR → R1
//! ```

use serde::{Serialize, Deserialize};
use crate::asm::Opcode;
use crate::cpu::Component;
use crate::word::{arith, HexValue, Word16};

/// A transfer drawn as an arrow between two boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Component,
    pub to: Component,
}

/// One micro-step of the animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Box highlighted while the step is shown.
    pub highlight: Component,
    /// Status line text.
    pub message: String,
    /// Arrow drawn for this step, if any.
    pub transfer: Option<Transfer>,
    /// Value written back by this step, if any.
    pub result: Option<Word16>,
}

impl Step {
    fn show(highlight: Component, message: impl Into<String>) -> Self {
        Self { highlight, message: message.into(), transfer: None, result: None }
    }

    fn transfer(from: Component, to: Component, message: impl Into<String>) -> Self {
        Self {
            highlight: from,
            message: message.into(),
            transfer: Some(Transfer { from, to }),
            result: None,
        }
    }

    fn with_result(mut self, result: Word16) -> Self {
        self.result = Some(result);
        self
    }
}

/// The steps for one instruction plus the value it leaves in R1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub result: Option<Word16>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Number of steps in the fetch phase.
pub const FETCH_STEPS: usize = 4;

/// The fetch phase, ending with `instr_text` shown in IR.
pub fn fetch_steps(instr_text: &str) -> Vec<Step> {
    use Component::*;

    vec![
        Step::transfer(Pc, Mar, "PC → MAR"),
        Step::transfer(Mar, Mdr, "MAR → MDR (read instruction)"),
        Step::transfer(Mdr, Ir, "MDR → IR (instruction fetched)"),
        Step::show(Ir, format!("IR = {}", instr_text)),
    ]
}

/// Compute what an opcode leaves in R1.
pub fn evaluate(op: Opcode, r1: Word16, r2: Word16) -> Word16 {
    match op {
        Opcode::Add => arith::add(r1, r2),
        Opcode::Sub => arith::subtract(r1, r2),
        Opcode::Mul => arith::multiply(r1, r2),
        Opcode::Mov => arith::mov(r2),
    }
}

/// Build the full step sequence for an instruction.
///
/// `op` is `None` for mnemonics the ALU does not support; those get the
/// fetch phase only and produce no result. Messages show the operands as
/// entered; the arithmetic uses their low 16 bits.
pub fn steps_for_instruction(op: Option<Opcode>, r1: HexValue, r2: HexValue, instr_text: &str) -> Plan {
    use Component::*;

    let mut steps = fetch_steps(instr_text);

    let Some(op) = op else {
        return Plan { steps, result: None };
    };

    let result = evaluate(op, r1.word(), r2.word());

    if op.uses_alu() {
        steps.push(Step::transfer(R1, Y, format!("R1 ({}) → Y", r1.to_hex())));
        steps.push(Step::transfer(Y, Alu, "Y → ALU"));
        steps.push(Step::transfer(R2, Alu, format!("R2 ({}) → ALU", r2.to_hex())));
        steps.push(Step::transfer(Alu, Z, format!("ALU {} → Z = {}", op, result.to_hex())));
        steps.push(Step::transfer(Z, R1, format!("Z → R1 = {}", result.to_hex())).with_result(result));
    } else {
        steps.push(Step::transfer(R2, Mdr, format!("R2 ({}) → MDR", r2.to_hex())));
        steps.push(Step::transfer(Mdr, R1, format!("MDR → R1 = {}", result.to_hex())).with_result(result));
    }

    Plan { steps, result: Some(result) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(plan: &Plan) -> Vec<&str> {
        plan.steps.iter().map(|s| s.message.as_str()).collect()
    }

    #[test]
    fn test_add_sequence() {
        let plan = steps_for_instruction(Some(Opcode::Add), HexValue::new(0xA), HexValue::new(0x5), "ADD R1,R2");
        assert_eq!(
            messages(&plan),
            [
                "PC → MAR",
                "MAR → MDR (read instruction)",
                "MDR → IR (instruction fetched)",
                "IR = ADD R1,R2",
                "R1 (A) → Y",
                "Y → ALU",
                "R2 (5) → ALU",
                "ALU ADD → Z = F",
                "Z → R1 = F",
            ]
        );
        assert_eq!(plan.result, Some(Word16::new(0xF)));
        assert_eq!(plan.steps.last().unwrap().result, Some(Word16::new(0xF)));
        assert!(plan.steps[..8].iter().all(|s| s.result.is_none()));
    }

    #[test]
    fn test_steps_highlight_their_source() {
        let plan = steps_for_instruction(Some(Opcode::Sub), HexValue::new(1), HexValue::new(2), "SUB R1,R2");
        for step in &plan.steps {
            if let Some(t) = step.transfer {
                assert_eq!(step.highlight, t.from);
            }
        }
        assert_eq!(plan.steps[3].transfer, None);
        assert_eq!(plan.steps[3].highlight, Component::Ir);
        assert_eq!(plan.steps[7].message, "ALU SUB → Z = FFFF");
    }

    #[test]
    fn test_mov_sequence() {
        let plan = steps_for_instruction(Some(Opcode::Mov), HexValue::new(0xA), HexValue::new(0x7B), "MOV R1,R2");
        assert_eq!(plan.len(), FETCH_STEPS + 2);
        assert_eq!(messages(&plan)[4..], ["R2 (7B) → MDR", "MDR → R1 = 7B"]);
        assert_eq!(
            plan.steps[5].transfer,
            Some(Transfer { from: Component::Mdr, to: Component::R1 })
        );
        assert_eq!(plan.result, Some(Word16::new(0x7B)));
    }

    #[test]
    fn test_mul_masks() {
        let plan = steps_for_instruction(Some(Opcode::Mul), HexValue::new(0x1234), HexValue::new(0x100), "MUL R1,R2");
        assert_eq!(plan.result, Some(Word16::new(0x3400)));
    }

    #[test]
    fn test_messages_show_operands_as_entered() {
        let r1 = HexValue::new(0x12345);
        let r2 = HexValue::new(-5);
        let plan = steps_for_instruction(Some(Opcode::Add), r1, r2, "ADD R1,R2");
        assert_eq!(plan.steps[4].message, "R1 (12345) → Y");
        assert_eq!(plan.steps[6].message, "R2 (-5) → ALU");
        // 0x12345 - 5 = 0x12340
        assert_eq!(plan.result, Some(Word16::new(0x2340)));
        assert_eq!(plan.steps[7].message, "ALU ADD → Z = 2340");
    }

    #[test]
    fn test_unsupported_is_fetch_only() {
        let plan = steps_for_instruction(None, HexValue::new(1), HexValue::new(2), "DIV R1,R2");
        assert_eq!(plan.len(), FETCH_STEPS);
        assert_eq!(plan.result, None);
        assert_eq!(plan.steps[3].message, "IR = DIV R1,R2");
    }
}
