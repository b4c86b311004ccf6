//! Cooperative animation timing.
//!
//! Nothing here sleeps or spawns. Callers feed elapsed time in and get back
//! the highlight/redraw events that became due, so the same timeline drives
//! the terminal loop, a browser `requestAnimationFrame` callback, or a
//! plain `thread::sleep` loop in the CLI.

pub mod easing;
pub mod timeline;
pub mod player;

pub use easing::Easing;
pub use timeline::{AnimationConfig, Position, Timeline, TimingError, MAX_TIMING_MS};
pub use player::{AnimEvent, Player};
