//! Turns elapsed time into animation events.

use crate::anim::{AnimationConfig, Position, Timeline};

/// Something the caller has to do to the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimEvent {
    /// Show step `i`: highlight its box, set the status, draw its arrow.
    Highlight(usize),
    /// Re-route step `i`'s arrow against the current layout.
    Redraw(usize),
    /// All steps have been shown.
    Finished,
}

/// Plays a [`Timeline`].
///
/// Every event is delivered exactly once and in order, however coarse the
/// caller's clock is: a single late `advance` call returns everything that
/// became due since the previous one.
#[derive(Debug, Clone)]
pub struct Player {
    timeline: Timeline,
    /// Index of the next event to deliver; `steps * ticks` is `Finished`.
    cursor: u64,
    elapsed_ms: u64,
    finished: bool,
}

impl Player {
    pub fn new(steps: usize, config: AnimationConfig) -> Self {
        Self {
            timeline: Timeline::new(steps, config),
            cursor: 0,
            elapsed_ms: 0,
            finished: false,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn event_count(&self) -> u64 {
        (self.timeline.steps() as u64).saturating_mul(self.timeline.config().ticks_per_step())
    }

    fn event_at(&self, index: u64) -> (u64, AnimEvent) {
        if index >= self.event_count() {
            return (self.timeline.total_ms(), AnimEvent::Finished);
        }
        let config = self.timeline.config();
        let ticks = config.ticks_per_step();
        let step = (index / ticks) as usize;
        let tick = index % ticks;
        let at = self
            .timeline
            .step_start(step)
            .saturating_add(tick.saturating_mul(config.tick_len()));
        let event = if tick == 0 { AnimEvent::Highlight(step) } else { AnimEvent::Redraw(step) };
        (at, event)
    }

    /// Move the clock to `elapsed_ms` (since the animation started) and
    /// collect every event that became due. Going backwards is a no-op.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<AnimEvent> {
        self.elapsed_ms = self.elapsed_ms.max(elapsed_ms);

        let mut events = Vec::new();
        while !self.finished {
            let (at, event) = self.event_at(self.cursor);
            if at > self.elapsed_ms {
                break;
            }
            if event == AnimEvent::Finished {
                self.finished = true;
            }
            events.push(event);
            self.cursor += 1;
        }
        events
    }

    /// Time until the next event, or `None` once finished.
    pub fn next_due_in(&self) -> Option<u64> {
        if self.finished {
            return None;
        }
        let (at, _) = self.event_at(self.cursor);
        Some(at.saturating_sub(self.elapsed_ms))
    }

    /// Fraction of the active arrow to draw right now.
    pub fn arrow_progress(&self) -> f64 {
        match self.timeline.position(self.elapsed_ms) {
            Position::Active { progress, .. } => self.timeline.config().easing.apply(progress),
            Position::Pause { .. } | Position::Finished => 1.0,
        }
    }

    /// Current position on the timeline.
    pub fn position(&self) -> Position {
        self.timeline.position(self.elapsed_ms)
    }
}
