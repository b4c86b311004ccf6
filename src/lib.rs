//! # Datapath Visualizer
//!
//! An animated walk through the micro-operations of a simple CPU datapath.
//!
//! An instruction such as `ADD R1,R2` is fetched (PC → MAR → MDR → IR) and
//! executed through the Y/ALU/Z latches, one highlighted box and one curved
//! arrow at a time. The same core drives a command-line renderer, a
//! terminal animation, and WebAssembly bindings for the browser.

pub mod word;
pub mod asm;
pub mod cpu;
pub mod diagram;
pub mod anim;
pub mod config;
pub mod logging;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use word::{Word16, HexValue, HexError};
pub use asm::{parse_instruction, Opcode, ParsedInstruction, ParseError};
pub use cpu::{Component, Datapath, DatapathError, Plan, Step, Scene, steps_for_instruction};
pub use diagram::{Layout, CurvedArrow, Point, RectInfo, curved_arrow, edge_point_towards, render_svg};
pub use anim::{AnimationConfig, AnimEvent, Easing, Player, Timeline};
pub use config::{Config, ConfigError};

#[cfg(feature = "tui")]
pub use tui::run_visualizer;
