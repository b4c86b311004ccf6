//! Terminal front end for the datapath visualizer.
//!
//! Provides an interactive terminal animation with:
//! - The datapath diagram drawn on a braille canvas
//! - Curved arrows that grow and re-route on every tick
//! - Editable R1/R2/instruction inputs
//! - Run/reset controls and a status line

mod app;
mod ui;

pub use app::{Field, VisualizerApp, run_visualizer};
