//! The datapath session.
//!
//! Holds everything the diagram shows: register inputs and box values, the
//! instruction text, the highlighted box, the arrows drawn so far and the
//! status line. A run goes `start` → `highlight_step` for each step (with
//! any number of `redraw_arrow` calls in between) → `finish`.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::asm::{parse_instruction, ParseError};
use crate::cpu::microcode::{steps_for_instruction, Plan, Step};
use crate::cpu::scene::{ArrowView, BoxView, Scene};
use crate::cpu::{Component, Registers};
use crate::diagram::geometry::{curved_arrow, CurvedArrow};
use crate::diagram::{Layout, LayoutError};
use crate::word::{HexError, Word16};

/// Where the session is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Nothing started since the last reset (or the last start failed).
    Idle,
    /// A plan is being stepped through.
    Running,
    /// The last plan has been finished.
    Done,
}

/// An arrow that has been drawn for a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawnArrow {
    pub from: Component,
    pub to: Component,
    pub curve: CurvedArrow,
    pub active: bool,
}

/// The instruction currently running.
#[derive(Debug, Clone)]
struct Run {
    mnemonic: String,
    plan: Plan,
}

/// The datapath diagram's state.
#[derive(Debug, Clone)]
pub struct Datapath {
    /// R1/R2 inputs and box values.
    pub regs: Registers,
    /// Instruction text as entered.
    pub instr_text: String,
    /// Status line.
    pub status: String,
    /// Highlighted box.
    pub active: Option<Component>,
    /// Current run state.
    pub state: RunState,
    /// Arrows by step index. They stay in place across runs until reset.
    arrows: BTreeMap<usize, DrawnArrow>,
    run: Option<Run>,
}

impl Datapath {
    /// Create a session from the three inputs.
    pub fn new(r1: impl Into<String>, r2: impl Into<String>, instr: impl Into<String>) -> Self {
        Self {
            regs: Registers::new(r1, r2),
            instr_text: instr.into(),
            status: String::new(),
            active: None,
            state: RunState::Idle,
            arrows: BTreeMap::new(),
            run: None,
        }
    }

    /// Validate the inputs and build the plan for the instruction.
    ///
    /// On failure the status line carries the error message and the
    /// session stays idle.
    pub fn start(&mut self) -> Result<&Plan, DatapathError> {
        match self.prepare() {
            Ok(run) => {
                info!(mnemonic = %run.mnemonic, steps = run.plan.len(), "starting instruction");
                self.status = format!("Running {}...", run.mnemonic);
                self.state = RunState::Running;
                Ok(&self.run.insert(run).plan)
            }
            Err(e) => {
                warn!(error = %e, "rejected inputs");
                self.status = e.to_string();
                self.state = RunState::Idle;
                self.run = None;
                Err(e)
            }
        }
    }

    fn prepare(&mut self) -> Result<Run, DatapathError> {
        let r1 = self.regs.r1.value().map_err(|source| DatapathError::InvalidHex {
            register: Component::R1,
            source,
        })?;
        let r2 = self.regs.r2.value().map_err(|source| DatapathError::InvalidHex {
            register: Component::R2,
            source,
        })?;

        // The boxes show what was loaded even if the instruction is rejected.
        self.regs.sync_shown();

        let parsed = parse_instruction(&self.instr_text).map_err(DatapathError::InvalidInstruction)?;
        if !parsed.is_register_pair() {
            warn!(instruction = %parsed, "operands are ignored; the datapath always runs R1,R2");
        }

        let text = self.instr_text.trim().to_uppercase();
        let plan = steps_for_instruction(parsed.opcode(), r1, r2, &text);

        Ok(Run { mnemonic: parsed.mnemonic, plan })
    }

    /// The running (or just finished) plan.
    pub fn plan(&self) -> Option<&Plan> {
        self.run.as_ref().map(|r| &r.plan)
    }

    fn step(&self, index: usize) -> Result<&Step, DatapathError> {
        let run = self.run.as_ref().ok_or(DatapathError::NotRunning)?;
        run.plan.steps.get(index).ok_or(DatapathError::StepOutOfRange {
            index,
            len: run.plan.len(),
        })
    }

    /// Show step `index`: highlight its box, set the status, and draw its
    /// arrow as the only active one.
    pub fn highlight_step(&mut self, index: usize, layout: &Layout) -> Result<(), DatapathError> {
        let step = self.step(index)?.clone();

        for arrow in self.arrows.values_mut() {
            arrow.active = false;
        }

        self.active = Some(step.highlight);
        self.status = step.message.clone();
        debug!(index, component = %step.highlight, message = %step.message, "highlight step");

        if let Some(transfer) = step.transfer {
            let curve = route(transfer.from, transfer.to, layout)?;
            self.arrows.insert(
                index,
                DrawnArrow { from: transfer.from, to: transfer.to, curve, active: true },
            );
        }

        Ok(())
    }

    /// Recompute the arrow for step `index` against a (possibly resized)
    /// layout. Steps without an arrow are left alone.
    pub fn redraw_arrow(&mut self, index: usize, layout: &Layout) -> Result<(), DatapathError> {
        let Some(transfer) = self.step(index)?.transfer else {
            return Ok(());
        };
        let curve = route(transfer.from, transfer.to, layout)?;
        self.arrows
            .entry(index)
            .and_modify(|a| a.curve = curve)
            .or_insert(DrawnArrow { from: transfer.from, to: transfer.to, curve, active: false });
        Ok(())
    }

    /// Complete the run, writing the result back into R1.
    pub fn finish(&mut self) -> Result<Option<Word16>, DatapathError> {
        let run = self.run.as_ref().ok_or(DatapathError::NotRunning)?;
        if self.state != RunState::Running {
            return Err(DatapathError::NotRunning);
        }

        let result = run.plan.result;
        match result {
            Some(value) => {
                self.regs.r1.commit(value);
                self.status = format!("Done — {} result: {}", run.mnemonic, value.to_padded_hex());
            }
            None => {
                self.status = format!("Done — {} (no numeric result)", run.mnemonic);
            }
        }
        info!(mnemonic = %run.mnemonic, ?result, "instruction finished");

        self.state = RunState::Done;
        Ok(result)
    }

    /// Remove all arrows and highlights and show the inputs again.
    pub fn reset(&mut self) {
        self.arrows.clear();
        self.active = None;
        self.regs.sync_shown();
        self.status = "Reset".into();
        self.state = RunState::Idle;
        self.run = None;
        debug!("datapath reset");
    }

    /// Start, show every step in order, and finish, with no timing.
    pub fn run_to_completion(&mut self, layout: &Layout) -> Result<Option<Word16>, DatapathError> {
        let len = self.start()?.len();
        for index in 0..len {
            self.highlight_step(index, layout)?;
        }
        self.finish()
    }

    /// Arrows drawn so far, by step index.
    pub fn arrows(&self) -> impl Iterator<Item = (usize, &DrawnArrow)> {
        self.arrows.iter().map(|(i, a)| (*i, a))
    }

    fn register_text(&self, component: Component) -> String {
        match component {
            Component::R2 => self.regs.r2.shown.clone(),
            _ => self.regs.r1.shown.clone(),
        }
    }

    /// Snapshot for renderers.
    pub fn scene(&self) -> Scene {
        let boxes = Component::ALL
            .into_iter()
            .map(|component| BoxView {
                component,
                value: component.shows_value().then(|| self.register_text(component)),
                active: self.active == Some(component),
            })
            .collect();

        let arrows = self
            .arrows
            .iter()
            .map(|(index, arrow)| ArrowView {
                id: format!("arrow-{}", index),
                from: arrow.from,
                to: arrow.to,
                curve: arrow.curve,
                active: arrow.active,
            })
            .collect();

        Scene { boxes, arrows, status: self.status.clone() }
    }
}

fn route(from: Component, to: Component, layout: &Layout) -> Result<CurvedArrow, LayoutError> {
    Ok(curved_arrow(&layout.rect_info(from)?, &layout.rect_info(to)?, layout.center()))
}

/// Errors from driving the datapath.
#[derive(Debug, Clone, Error)]
pub enum DatapathError {
    #[error("Enter valid hex in R1 and R2")]
    InvalidHex { register: Component, source: HexError },

    #[error("Instruction format invalid. Use: OPCODE R1,R2")]
    InvalidInstruction(#[source] ParseError),

    #[error("no instruction is running")]
    NotRunning,

    #[error("step {index} out of range ({len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(r1: &str, r2: &str, instr: &str) -> Datapath {
        let mut dp = Datapath::new(r1, r2, instr);
        dp.run_to_completion(&Layout::default()).unwrap();
        dp
    }

    #[test]
    fn test_add_writes_back() {
        let dp = run("A", "5", "ADD R1,R2");
        assert_eq!(dp.regs.r1.input, "0F");
        assert_eq!(dp.regs.r1.shown, "0F");
        assert_eq!(dp.regs.r2.shown, "5");
        assert_eq!(dp.status, "Done — ADD result: 0F");
        assert_eq!(dp.state, RunState::Done);
    }

    #[test]
    fn test_sub_wraps_and_mul_masks() {
        assert_eq!(run("5", "A", "SUB R1,R2").regs.r1.input, "FFFB");
        assert_eq!(run("1234", "100", "mul r1, r2").regs.r1.input, "3400");
    }

    #[test]
    fn test_mov() {
        let dp = run("1", "7b", "MOV R1,R2");
        assert_eq!(dp.regs.r1.input, "7B");
        assert_eq!(dp.status, "Done — MOV result: 7B");
    }

    #[test]
    fn test_unsupported_opcode() {
        let dp = run("1", "2", "DIV R1,R2");
        assert_eq!(dp.regs.r1.input, "1");
        assert_eq!(dp.status, "Done — DIV (no numeric result)");
        assert_eq!(dp.arrows().count(), 3);
    }

    #[test]
    fn test_invalid_hex_sets_status() {
        let mut dp = Datapath::new("xyz", "5", "ADD R1,R2");
        let err = dp.start().unwrap_err();
        assert!(matches!(err, DatapathError::InvalidHex { register: Component::R1, .. }));
        assert_eq!(dp.status, "Enter valid hex in R1 and R2");
        assert_eq!(dp.state, RunState::Idle);
        assert!(dp.plan().is_none());
    }

    #[test]
    fn test_inputs_read_as_leading_hex() {
        let mut dp = Datapath::new("1G", "2", "ADD R1,R2");
        let plan = dp.start().unwrap();
        assert_eq!(plan.steps[4].message, "R1 (1) → Y");
        assert_eq!(dp.regs.r1.shown, "1G");
        assert_eq!(dp.run_to_completion(&Layout::default()).unwrap(), Some(Word16::new(3)));

        let mut dp = Datapath::new("12345", "-5", "ADD R1,R2");
        let plan = dp.start().unwrap();
        assert_eq!(plan.steps[4].message, "R1 (12345) → Y");
        assert_eq!(plan.steps[6].message, "R2 (-5) → ALU");
        assert_eq!(dp.run_to_completion(&Layout::default()).unwrap(), Some(Word16::new(0x2340)));
        assert_eq!(dp.regs.r1.input, "2340");
    }

    #[test]
    fn test_invalid_instruction_sets_status_but_loads_boxes() {
        let mut dp = Datapath::new("a", "b", "ADD R1");
        dp.regs.r1.shown = "stale".into();
        assert!(matches!(dp.start(), Err(DatapathError::InvalidInstruction(_))));
        assert_eq!(dp.status, "Instruction format invalid. Use: OPCODE R1,R2");
        assert_eq!(dp.regs.r1.shown, "A");
    }

    #[test]
    fn test_start_sets_running_status() {
        let mut dp = Datapath::new("1", "2", "  add r1,r2 ");
        let plan = dp.start().unwrap();
        assert_eq!(plan.steps[3].message, "IR = ADD R1,R2");
        assert_eq!(dp.status, "Running ADD...");
        assert_eq!(dp.state, RunState::Running);
    }

    #[test]
    fn test_highlight_keeps_one_active_arrow() {
        let layout = Layout::default();
        let mut dp = Datapath::new("1", "2", "ADD R1,R2");
        dp.start().unwrap();
        dp.highlight_step(0, &layout).unwrap();
        dp.highlight_step(1, &layout).unwrap();
        assert_eq!(dp.active, Some(Component::Mar));
        assert_eq!(dp.status, "MAR → MDR (read instruction)");
        let active: Vec<usize> = dp.arrows().filter(|(_, a)| a.active).map(|(i, _)| i).collect();
        assert_eq!(active, [1]);

        // Step 3 has no arrow: nothing is active afterwards.
        dp.highlight_step(2, &layout).unwrap();
        dp.highlight_step(3, &layout).unwrap();
        assert!(dp.arrows().all(|(_, a)| !a.active));
        assert_eq!(dp.arrows().count(), 3);
    }

    #[test]
    fn test_redraw_follows_layout() {
        let layout = Layout::default();
        let mut dp = Datapath::new("1", "2", "ADD R1,R2");
        dp.start().unwrap();
        dp.highlight_step(0, &layout).unwrap();
        let before = dp.arrows().next().unwrap().1.curve;

        dp.redraw_arrow(0, &layout.scaled(0.5, 0.5)).unwrap();
        let (_, after) = dp.arrows().next().unwrap();
        assert!(after.active);
        assert!((after.curve.start.x - before.start.x / 2.0).abs() < 1e-9);

        // IR step has no arrow to redraw.
        dp.redraw_arrow(3, &layout).unwrap();
        assert_eq!(dp.arrows().count(), 1);
    }

    #[test]
    fn test_step_errors() {
        let layout = Layout::default();
        let mut dp = Datapath::new("1", "2", "MOV R1,R2");
        assert!(matches!(dp.highlight_step(0, &layout), Err(DatapathError::NotRunning)));
        assert!(matches!(dp.finish(), Err(DatapathError::NotRunning)));

        dp.start().unwrap();
        assert!(matches!(
            dp.highlight_step(6, &layout),
            Err(DatapathError::StepOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_arrows_survive_rerun_until_reset() {
        let layout = Layout::default();
        let mut dp = Datapath::new("1", "2", "ADD R1,R2");
        dp.run_to_completion(&layout).unwrap();
        assert_eq!(dp.arrows().count(), 8);

        dp.instr_text = "MOV R1,R2".into();
        dp.run_to_completion(&layout).unwrap();
        assert_eq!(dp.arrows().count(), 8);

        dp.reset();
        assert_eq!(dp.arrows().count(), 0);
        assert_eq!(dp.active, None);
        assert_eq!(dp.status, "Reset");
        assert_eq!(dp.state, RunState::Idle);
    }

    #[test]
    fn test_reset_restores_boxes_from_inputs() {
        let mut dp = Datapath::new("1", "2", "ADD R1,R2");
        dp.regs.r1.input = "beef".into();
        dp.reset();
        assert_eq!(dp.regs.r1.shown, "BEEF");
        assert_eq!(dp.regs.r2.shown, "2");
    }

    #[test]
    fn test_scene_snapshot() {
        let layout = Layout::default();
        let mut dp = Datapath::new("a", "5", "ADD R1,R2");
        dp.start().unwrap();
        dp.highlight_step(4, &layout).unwrap();

        let scene = dp.scene();
        assert_eq!(scene.boxes.len(), 9);
        let r1 = scene.boxes.iter().find(|b| b.component == Component::R1).unwrap();
        assert!(r1.active);
        assert_eq!(r1.value.as_deref(), Some("A"));
        let r2 = scene.boxes.iter().find(|b| b.component == Component::R2).unwrap();
        assert_eq!(r2.value.as_deref(), Some("5"));
        for b in &scene.boxes {
            assert_eq!(b.value.is_some(), b.component.shows_value(), "{}", b.component);
        }
        assert_eq!(scene.arrows.len(), 1);
        assert_eq!(scene.arrows[0].id, "arrow-4");
        assert_eq!(scene.active_box(), Some(Component::R1));
        assert_eq!(scene.active_arrow().map(|a| a.to), Some(Component::Y));
        assert_eq!(scene.status, "R1 (A) → Y");
    }
}
