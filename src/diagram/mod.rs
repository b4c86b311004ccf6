//! The datapath diagram.
//!
//! - [`geometry`] - Edge intersection and curved-arrow routing
//! - [`layout`] - Where each component's box sits
//! - [`svg`] - SVG output for a scene

pub mod geometry;
pub mod layout;
pub mod svg;

pub use geometry::{curved_arrow, edge_point_towards, CurvedArrow, Point, RectInfo};
pub use layout::{Layout, LayoutError, Placement};
pub use svg::{render_svg, SvgError};
