//! Box placement inside the diagram container.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::cpu::Component;
use crate::diagram::geometry::{Point, RectInfo};

/// Where one component's box sits, by top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub component: Component,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn rect_info(&self) -> RectInfo {
        RectInfo::from_corner(self.x, self.y, self.width, self.height)
    }
}

/// The diagram container and the boxes inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub boxes: Vec<Placement>,
}

/// Default box size.
const BOX_W: f64 = 96.0;
const BOX_H: f64 = 48.0;

impl Default for Layout {
    fn default() -> Self {
        use Component::*;

        // Fetch path across the top, ALU path through the middle,
        // registers along the bottom.
        let grid = [
            (Pc, 60.0, 40.0),
            (Mar, 250.0, 40.0),
            (Mdr, 440.0, 40.0),
            (Ir, 700.0, 40.0),
            (Y, 250.0, 236.0),
            (Alu, 440.0, 236.0),
            (Z, 700.0, 236.0),
            (R1, 60.0, 432.0),
            (R2, 250.0, 432.0),
        ];

        Self {
            width: 900.0,
            height: 520.0,
            boxes: grid
                .into_iter()
                .map(|(component, x, y)| Placement { component, x, y, width: BOX_W, height: BOX_H })
                .collect(),
        }
    }
}

impl Layout {
    /// Look up a component's placement.
    pub fn placement(&self, component: Component) -> Result<&Placement, LayoutError> {
        self.boxes
            .iter()
            .find(|p| p.component == component)
            .ok_or(LayoutError::Missing(component))
    }

    /// Center and half extents of a component's box.
    pub fn rect_info(&self, component: Component) -> Result<RectInfo, LayoutError> {
        self.placement(component).map(Placement::rect_info)
    }

    /// Center of the container.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Container size as `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Scale every coordinate, as happens when the page is resized.
    pub fn scaled(&self, sx: f64, sy: f64) -> Layout {
        Layout {
            width: self.width * sx,
            height: self.height * sy,
            boxes: self
                .boxes
                .iter()
                .map(|p| Placement {
                    component: p.component,
                    x: p.x * sx,
                    y: p.y * sy,
                    width: p.width * sx,
                    height: p.height * sy,
                })
                .collect(),
        }
    }

    /// Check that every component is placed exactly once with a usable size.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LayoutError::EmptyContainer { width: self.width, height: self.height });
        }

        for component in Component::ALL {
            match self.boxes.iter().filter(|p| p.component == component).count() {
                0 => return Err(LayoutError::Missing(component)),
                1 => {}
                _ => return Err(LayoutError::Duplicate(component)),
            }
        }

        for p in &self.boxes {
            if !(p.width > 0.0 && p.height > 0.0) {
                return Err(LayoutError::EmptyBox(p.component));
            }
        }

        Ok(())
    }
}

/// Errors in a layout description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout has no box for {0}")]
    Missing(Component),

    #[error("layout places {0} more than once")]
    Duplicate(Component),

    #[error("box {0} has zero or negative size")]
    EmptyBox(Component),

    #[error("container must have a positive size (got {width}x{height})")]
    EmptyContainer { width: f64, height: f64 },
}
