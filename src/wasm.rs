//! WebAssembly bindings for the datapath visualizer.
//!
//! The page owns the clock: it calls [`WasmDatapath::start`] when the run
//! button is pressed and then [`WasmDatapath::tick`] from
//! `requestAnimationFrame` with the milliseconds since start, swapping the
//! returned SVG into the diagram container.

use wasm_bindgen::prelude::*;
use crate::anim::{AnimEvent, Player};
use crate::config::Config;
use crate::cpu::{Component, Datapath, DatapathError, RunState};
use crate::diagram::{curved_arrow, render_svg};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// WebAssembly-friendly datapath wrapper.
#[wasm_bindgen]
pub struct WasmDatapath {
    datapath: Datapath,
    config: Config,
    player: Option<Player>,
}

#[wasm_bindgen]
impl WasmDatapath {
    /// Create a datapath with the page's initial input values.
    #[wasm_bindgen(constructor)]
    pub fn new(r1: &str, r2: &str, instr: &str) -> Self {
        Self {
            datapath: Datapath::new(r1, r2, instr),
            config: Config::default(),
            player: None,
        }
    }

    /// Replace timing and layout with a JSON config.
    #[wasm_bindgen]
    pub fn configure(&mut self, json: &str) -> Result<(), JsError> {
        self.config = Config::from_json(json).map_err(js_err)?;
        Ok(())
    }

    /// Update the three inputs (e.g. from text fields).
    #[wasm_bindgen]
    pub fn set_inputs(&mut self, r1: &str, r2: &str, instr: &str) {
        self.datapath.regs.r1.input = r1.to_string();
        self.datapath.regs.r2.input = r2.to_string();
        self.datapath.instr_text = instr.to_string();
    }

    /// Validate inputs and begin animating. Returns the number of steps.
    ///
    /// On invalid input the error message is also left in `status()`.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<usize, JsError> {
        if self.player.is_some() {
            return Err(JsError::new("an instruction is already running"));
        }
        let len = self.datapath.start().map_err(js_err)?.len();
        self.player = Some(Player::new(len, self.config.animation));
        Ok(len)
    }

    /// Advance to `elapsed_ms` after `start()` and return the frame as SVG.
    #[wasm_bindgen]
    pub fn tick(&mut self, elapsed_ms: f64) -> Result<String, JsError> {
        let mut progress = 1.0;
        if let Some(player) = self.player.as_mut() {
            let events = player.advance(elapsed_ms.max(0.0) as u64);
            progress = player.arrow_progress();
            for event in events {
                apply(&mut self.datapath, &self.config, event).map_err(js_err)?;
            }
            if self.datapath.state == RunState::Done {
                self.player = None;
            }
        }
        render_svg(&self.datapath.scene(), &self.config.layout, progress).map_err(js_err)
    }

    /// Current frame without advancing time.
    #[wasm_bindgen]
    pub fn svg(&self) -> Result<String, JsError> {
        render_svg(&self.datapath.scene(), &self.config.layout, 1.0).map_err(js_err)
    }

    /// Is an animation playing?
    #[wasm_bindgen]
    pub fn is_animating(&self) -> bool {
        self.player.is_some()
    }

    /// Status line text.
    #[wasm_bindgen]
    pub fn status(&self) -> String {
        self.datapath.status.clone()
    }

    /// R1 input text (updated with the result when a run finishes).
    #[wasm_bindgen]
    pub fn r1(&self) -> String {
        self.datapath.regs.r1.input.clone()
    }

    /// Clear arrows and highlights.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.player = None;
        self.datapath.reset();
    }

    /// Status messages of the current plan, in order.
    #[wasm_bindgen]
    pub fn steps(&self) -> js_sys::Array {
        self.datapath
            .plan()
            .map(|plan| plan.steps.iter().map(|s| JsValue::from_str(&s.message)).collect())
            .unwrap_or_else(js_sys::Array::new)
    }

    /// The current plan as JSON (`null` before a run).
    #[wasm_bindgen]
    pub fn plan_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.datapath.plan()).map_err(js_err)
    }

    /// The current scene as JSON, for pages that draw it themselves.
    #[wasm_bindgen]
    pub fn scene_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.datapath.scene()).map_err(js_err)
    }
}

fn apply(datapath: &mut Datapath, config: &Config, event: AnimEvent) -> Result<(), DatapathError> {
    match event {
        AnimEvent::Highlight(i) => datapath.highlight_step(i, &config.layout),
        AnimEvent::Redraw(i) => datapath.redraw_arrow(i, &config.layout),
        AnimEvent::Finished => datapath.finish().map(|_| ()),
    }
}

/// SVG path data for an arrow between two components in the default layout.
#[wasm_bindgen]
pub fn wasm_arrow_path(from: &str, to: &str) -> Result<String, JsError> {
    let from: Component = from.parse().map_err(js_err)?;
    let to: Component = to.parse().map_err(js_err)?;
    let layout = Config::default().layout;
    let a = layout.rect_info(from).map_err(js_err)?;
    let b = layout.rect_info(to).map_err(js_err)?;
    Ok(curved_arrow(&a, &b, layout.center()).path_data())
}

/// Run an instruction without animation and return the new R1 text.
#[wasm_bindgen]
pub fn wasm_run(r1: &str, r2: &str, instr: &str) -> Result<String, JsError> {
    let mut datapath = Datapath::new(r1, r2, instr);
    datapath
        .run_to_completion(&Config::default().layout)
        .map_err(js_err)?;
    Ok(datapath.regs.r1.input)
}
