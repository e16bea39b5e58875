//! Alpha (easing) functions applied to normalized animator progress.

use serde::{Deserialize, Serialize};

use crate::interp::bezier_ease;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AlphaFunction {
    /// Linear progress; the default for new animations.
    Default,
    Linear,
    Reverse,
    EaseInSquare,
    EaseOutSquare,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Quarter sine arc; fast start, soft landing.
    Sin,
    /// Rises to 1 and returns to 0 over the window.
    Bounce,
    /// Cubic-bezier control points (x1, y1, x2, y2).
    CustomBezier([f32; 4]),
}

impl Default for AlphaFunction {
    fn default() -> Self {
        AlphaFunction::Default
    }
}

impl AlphaFunction {
    /// Map raw progress `p` in [0,1] to eased progress.
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            AlphaFunction::Default | AlphaFunction::Linear => p,
            AlphaFunction::Reverse => 1.0 - p,
            AlphaFunction::EaseInSquare => p * p,
            AlphaFunction::EaseOutSquare => 1.0 - (1.0 - p) * (1.0 - p),
            AlphaFunction::EaseIn => bezier_ease(p, [0.42, 0.0, 1.0, 1.0]),
            AlphaFunction::EaseOut => bezier_ease(p, [0.0, 0.0, 0.58, 1.0]),
            AlphaFunction::EaseInOut => bezier_ease(p, [0.42, 0.0, 0.58, 1.0]),
            AlphaFunction::Sin => (p * std::f32::consts::FRAC_PI_2).sin(),
            AlphaFunction::Bounce => (p * std::f32::consts::PI).sin(),
            AlphaFunction::CustomBezier(ctrl) => bezier_ease(p, ctrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should keep every easing inside the window endpoints
    #[test]
    fn endpoints() {
        for alpha in [
            AlphaFunction::Default,
            AlphaFunction::EaseIn,
            AlphaFunction::EaseOut,
            AlphaFunction::EaseInOut,
            AlphaFunction::EaseInSquare,
            AlphaFunction::EaseOutSquare,
            AlphaFunction::Sin,
            AlphaFunction::CustomBezier([0.3, 0.1, 0.7, 0.9]),
        ] {
            assert!(alpha.apply(0.0).abs() < 1e-4, "{alpha:?} at 0");
            assert!((alpha.apply(1.0) - 1.0).abs() < 1e-4, "{alpha:?} at 1");
        }
        assert!((AlphaFunction::Reverse.apply(0.0) - 1.0).abs() < 1e-6);
        assert!(AlphaFunction::Bounce.apply(1.0).abs() < 1e-4);
    }
}
