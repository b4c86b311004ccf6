//! Progress curves for drawing the active arrow.

use serde::{Serialize, Deserialize};

/// How much of the active arrow is drawn as its step progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// The whole arrow appears as soon as the step starts.
    #[default]
    Instant,
    /// The arrow grows at a constant rate.
    Linear,
    /// The arrow grows slowly, speeds up, then settles (quadratic in-out).
    EaseInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to the drawn fraction.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Instant => 1.0,
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::Instant.apply(0.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_is_monotonic_and_symmetric() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = Easing::EaseInOut.apply(i as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
    }
}
