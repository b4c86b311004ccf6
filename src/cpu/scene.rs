//! Render-ready snapshot of the datapath.

use serde::{Serialize, Deserialize};
use crate::cpu::Component;
use crate::diagram::geometry::CurvedArrow;

/// One box as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxView {
    pub component: Component,
    /// Register value under the label (R1/R2 only).
    pub value: Option<String>,
    pub active: bool,
}

/// One arrow as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowView {
    /// Element id, `arrow-<step>`.
    pub id: String,
    pub from: Component,
    pub to: Component,
    pub curve: CurvedArrow,
    pub active: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub boxes: Vec<BoxView>,
    pub arrows: Vec<ArrowView>,
    pub status: String,
}

impl Scene {
    /// The active arrow, if any.
    pub fn active_arrow(&self) -> Option<&ArrowView> {
        self.arrows.iter().find(|a| a.active)
    }

    /// The highlighted box, if any.
    pub fn active_box(&self) -> Option<Component> {
        self.boxes.iter().find(|b| b.active).map(|b| b.component)
    }
}
