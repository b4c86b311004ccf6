//! The simple register-pair CPU datapath.
//!
//! This module models what the diagram shows:
//! - 9 components: PC, MAR, MDR, IR, R1, R2, Y, ALU, Z
//! - An R1/R2 register pair loaded from hex text
//! - Micro-step plans for ADD, SUB, MUL and MOV
//! - A session that steps through a plan and tracks highlights and arrows

pub mod component;
pub mod registers;
pub mod microcode;
pub mod scene;
pub mod execute;

pub use component::Component;
pub use registers::{Registers, RegisterField};
pub use microcode::{Plan, Step, Transfer, steps_for_instruction};
pub use scene::{Scene, BoxView, ArrowView};
pub use execute::{Datapath, DatapathError, RunState, DrawnArrow};
