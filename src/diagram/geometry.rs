//! Arrow geometry.
//!
//! Arrows leave a box where the ray from its center towards the other box
//! crosses its border, and bend into a quadratic Bézier whose control point
//! sits on the side of the chord facing away from the diagram center. That
//! keeps arrows between neighbouring boxes from flipping as the layout
//! changes size.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Components below this magnitude are treated as zero.
const EPSILON: f64 = 1e-6;

/// Pulled off the ray parameter so endpoints sit just inside the border.
const EDGE_SHRINK: f64 = 0.08;

/// Smallest control-point offset, in diagram units.
pub const MIN_BEND: f64 = 28.0;

/// Largest control-point offset, in diagram units.
pub const MAX_BEND: f64 = 140.0;

/// A point in container-local coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A box described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectInfo {
    pub cx: f64,
    pub cy: f64,
    pub hw: f64,
    pub hh: f64,
}

impl RectInfo {
    /// Build from a top-left corner and a size.
    pub fn from_corner(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            cx: x + width / 2.0,
            cy: y + height / 2.0,
            hw: width / 2.0,
            hh: height / 2.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Whether a point lies inside or on the border (with a small tolerance).
    pub fn contains(&self, p: Point) -> bool {
        (p.x - self.cx).abs() <= self.hw + EPSILON && (p.y - self.cy).abs() <= self.hh + EPSILON
    }
}

/// Where a ray from the rectangle's center along `(vx, vy)` meets its border.
///
/// The vector is in the same units as the rectangle, so for a vector that
/// reaches well outside the box the result lies just inside the border. A
/// zero vector yields the center.
pub fn edge_point_towards(rect: &RectInfo, vx: f64, vy: f64) -> Point {
    if vx.abs() < EPSILON && vy.abs() < EPSILON {
        return rect.center();
    }

    let tx = if vx.abs() > EPSILON { rect.hw / vx.abs() } else { f64::INFINITY };
    let ty = if vy.abs() > EPSILON { rect.hh / vy.abs() } else { f64::INFINITY };
    let t = tx.min(ty);
    let scale = (t - EDGE_SHRINK).max(0.0);

    Point::new(rect.cx + vx * scale, rect.cy + vy * scale)
}

/// A quadratic Bézier arrow between two boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvedArrow {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl CurvedArrow {
    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        Point::new(
            a * self.start.x + b * self.control.x + c * self.end.x,
            a * self.start.y + b * self.control.y + c * self.end.y,
        )
    }

    /// Unit tangent at parameter `t`, used to orient arrowheads.
    pub fn tangent_at(&self, t: f64) -> (f64, f64) {
        let t = t.clamp(0.0, 1.0);
        let dx = 2.0 * (1.0 - t) * (self.control.x - self.start.x)
            + 2.0 * t * (self.end.x - self.control.x);
        let dy = 2.0 * (1.0 - t) * (self.control.y - self.start.y)
            + 2.0 * t * (self.end.y - self.control.y);
        let len = dx.hypot(dy);
        if len < EPSILON {
            (0.0, 0.0)
        } else {
            (dx / len, dy / len)
        }
    }

    /// `segments + 1` evenly spaced points along the curve, up to `until`.
    pub fn sample(&self, segments: usize, until: f64) -> Vec<Point> {
        let segments = segments.max(1);
        let until = until.clamp(0.0, 1.0);
        (0..=segments)
            .map(|i| self.point_at(until * i as f64 / segments as f64))
            .collect()
    }

    /// Approximate arc length.
    pub fn length(&self) -> f64 {
        self.sample(32, 1.0)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// SVG path data: `M sx sy Q cx cy ex ey`, one decimal per coordinate.
    pub fn path_data(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            Coord(self.start.x),
            Coord(self.start.y),
            Coord(self.control.x),
            Coord(self.control.y),
            Coord(self.end.x),
            Coord(self.end.y),
        )
    }
}

/// One-decimal coordinate formatted like JavaScript's `toFixed(1)`: rounded
/// on the exact binary value with ties away from zero, and signed whenever
/// the value is below zero (`-0.04` prints as `-0.0`, `-0.0` as `0.0`).
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.0;
        if !x.is_finite() {
            return write!(f, "{}", x);
        }
        let sign = if x < 0.0 { "-" } else { "" };
        let a = x.abs();
        // Only quarter fractions sit exactly halfway between two tenths.
        if (a * 4.0).fract() == 0.0 && (a * 2.0).fract() != 0.0 {
            write!(f, "{}{:.1}", sign, (a * 10.0).round() / 10.0)
        } else {
            write!(f, "{}{:.1}", sign, a)
        }
    }
}

/// Bend offset for a chord of length `dist`.
pub fn bend_offset(dist: f64) -> f64 {
    (dist / 3.0).max(MIN_BEND).min(MAX_BEND)
}

/// Route an arrow from one box to another. The curve bows away from
/// `center`, the middle of the container both boxes sit in.
pub fn curved_arrow(from: &RectInfo, to: &RectInfo, center: Point) -> CurvedArrow {
    let vx = to.cx - from.cx;
    let vy = to.cy - from.cy;
    let start = edge_point_towards(from, vx, vy);
    let end = edge_point_towards(to, -vx, -vy);

    let mid = start.midpoint(end);
    let dist = start.distance(end);

    let mut px = -(end.y - start.y);
    let mut py = end.x - start.x;
    let plen = match px.hypot(py) {
        len if len == 0.0 => 1.0,
        len => len,
    };
    px /= plen;
    py /= plen;

    let offset = bend_offset(dist);

    let to_center_x = center.x - mid.x;
    let to_center_y = center.y - mid.y;
    let dot = px * to_center_x + py * to_center_y;
    let sign = if dot > 0.0 { -1.0 } else { 1.0 };

    let control = Point::new(mid.x + px * offset * sign, mid.y + py * offset * sign);

    CurvedArrow { start, control, end }
}
