//! Datapath components drawn as boxes in the diagram.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// One labeled box in the datapath diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Component {
    /// Program counter
    Pc,
    /// Memory address register
    Mar,
    /// Memory data register
    Mdr,
    /// Instruction register
    Ir,
    /// First general-purpose register (destination)
    R1,
    /// Second general-purpose register (source)
    R2,
    /// ALU input latch
    Y,
    /// Arithmetic logic unit
    Alu,
    /// ALU output latch
    Z,
}

impl Component {
    /// Every component, in drawing order.
    pub const ALL: [Component; 9] = [
        Component::Pc,
        Component::Mar,
        Component::Mdr,
        Component::Ir,
        Component::R1,
        Component::R2,
        Component::Y,
        Component::Alu,
        Component::Z,
    ];

    /// Label shown in the box; also used as the element id in SVG output.
    pub const fn label(self) -> &'static str {
        match self {
            Component::Pc => "PC",
            Component::Mar => "MAR",
            Component::Mdr => "MDR",
            Component::Ir => "IR",
            Component::R1 => "R1",
            Component::R2 => "R2",
            Component::Y => "Y",
            Component::Alu => "ALU",
            Component::Z => "Z",
        }
    }

    /// Whether the box shows a register value under its label.
    pub const fn shows_value(self) -> bool {
        matches!(self, Component::R1 | Component::R2)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Component::ALL
            .into_iter()
            .find(|c| c.label() == upper)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown datapath component: {0}")]
pub struct UnknownComponent(pub String);
