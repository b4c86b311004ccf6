//! Visualizer application state and logic.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::anim::{AnimEvent, Player};
use crate::config::Config;
use crate::cpu::{Datapath, DatapathError, RunState};

/// Which input has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    R1,
    R2,
    Instr,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::R1 => Field::R2,
            Field::R2 => Field::Instr,
            Field::Instr => Field::R1,
        }
    }
}

/// Visualizer application state.
pub struct VisualizerApp {
    /// The datapath being animated.
    pub datapath: Datapath,
    /// Timing and layout.
    pub config: Config,
    /// Animation in progress, if any.
    pub player: Option<Player>,
    /// Focused input.
    pub focus: Field,
    /// Should we quit?
    pub should_quit: bool,
    started_at: Option<Instant>,
}

impl VisualizerApp {
    /// Create the app with initial input values.
    pub fn new(r1: &str, r2: &str, instr: &str, config: Config) -> Self {
        let mut datapath = Datapath::new(r1, r2, instr);
        datapath.status = "Ready. Press Enter to run, Tab to switch input, Esc to quit.".into();

        Self {
            datapath,
            config,
            player: None,
            focus: Field::Instr,
            should_quit: false,
            started_at: None,
        }
    }

    /// Is an animation playing?
    pub fn is_animating(&self) -> bool {
        self.player.is_some()
    }

    /// Start animating the current inputs.
    pub fn run(&mut self, now: Instant) {
        if self.is_animating() {
            return;
        }
        // A failed start leaves its message on the status line.
        if let Ok(plan) = self.datapath.start() {
            self.player = Some(Player::new(plan.len(), self.config.animation));
            self.started_at = Some(now);
        }
    }

    /// Advance the animation to wall-clock time `now`.
    pub fn tick(&mut self, now: Instant) {
        let Some(started) = self.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(started).as_millis() as u64;
        self.advance_to(elapsed);
    }

    /// Advance the animation to `elapsed_ms` after it started.
    pub fn advance_to(&mut self, elapsed_ms: u64) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        for event in player.advance(elapsed_ms) {
            if let Err(e) = self.apply(event) {
                self.datapath.status = format!("Error: {}", e);
                self.stop();
                return;
            }
        }

        if self.datapath.state == RunState::Done {
            self.stop();
        }
    }

    fn apply(&mut self, event: AnimEvent) -> Result<(), DatapathError> {
        let layout = &self.config.layout;
        match event {
            AnimEvent::Highlight(i) => self.datapath.highlight_step(i, layout),
            AnimEvent::Redraw(i) => self.datapath.redraw_arrow(i, layout),
            AnimEvent::Finished => self.datapath.finish().map(|_| ()),
        }
    }

    fn stop(&mut self) {
        debug!("animation stopped");
        self.player = None;
        self.started_at = None;
    }

    /// Clear arrows and highlights.
    pub fn reset(&mut self) {
        self.stop();
        self.datapath.reset();
    }

    /// Fraction of the active arrow to draw.
    pub fn arrow_progress(&self) -> f64 {
        self.player.as_ref().map_or(1.0, Player::arrow_progress)
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self) -> Duration {
        let ms = self
            .player
            .as_ref()
            .and_then(Player::next_due_in)
            .unwrap_or(250)
            .clamp(1, 50);
        Duration::from_millis(ms)
    }

    /// Move focus to the next input.
    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    /// Text of an input field.
    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::R1 => &self.datapath.regs.r1.input,
            Field::R2 => &self.datapath.regs.r2.input,
            Field::Instr => &self.datapath.instr_text,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::R1 => &mut self.datapath.regs.r1.input,
            Field::R2 => &mut self.datapath.regs.r2.input,
            Field::Instr => &mut self.datapath.instr_text,
        }
    }

    /// Type a character into the focused input.
    pub fn type_char(&mut self, c: char) {
        self.field_mut().push(c);
    }

    /// Delete the last character of the focused input.
    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }
}

/// Run the visualizer in the terminal.
pub fn run_visualizer(r1: &str, r2: &str, instr: &str, config: Config) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = VisualizerApp::new(r1, r2, instr, config);

    // Main loop
    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.should_quit = true,
                        KeyCode::Enter => app.run(Instant::now()),
                        KeyCode::Tab => app.next_field(),
                        KeyCode::Backspace => app.backspace(),
                        KeyCode::Delete => app.reset(),
                        KeyCode::Char(c) => app.type_char(c),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
