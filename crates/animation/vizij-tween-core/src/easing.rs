//! Progress remapping curves.
//!
//! An [`Easing`] maps a progress scalar in `[0,1]` to an eased progress in
//! roughly `[0,1]`. Named curves resolve case-insensitively; names that do not
//! resolve degrade to [`Easing::Linear`] with a warning instead of failing.

use std::fmt;
use std::rc::Rc;

use crate::interp::functions::bezier_ease_t;

/// Caller-supplied easing function.
pub type EasingFn = Rc<dyn Fn(f32) -> f32>;

#[derive(Clone, Default)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// Cubic-bezier timing with control points (x1, y1, x2, y2).
    CubicBezier([f32; 4]),
    Custom(EasingFn),
}

impl Easing {
    pub const EASE: Easing = Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]);
    pub const EASE_IN: Easing = Easing::CubicBezier([0.42, 0.0, 1.0, 1.0]);
    pub const EASE_OUT: Easing = Easing::CubicBezier([0.0, 0.0, 0.58, 1.0]);
    pub const EASE_IN_OUT: Easing = Easing::CubicBezier([0.42, 0.0, 0.58, 1.0]);

    /// Wrap a closure as an easing curve.
    pub fn custom(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Resolve a curve by name, returning `None` for unknown names.
    ///
    /// Accepts `in-out-quad`, `in_out_quad`, `inOutQuad`, `easeInOutQuad` and
    /// `cubic-bezier(x1, y1, x2, y2)`.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if let Some(ctrl) = parse_cubic_bezier(trimmed) {
            return Some(Easing::CubicBezier(ctrl));
        }
        let key: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        let easing = match key.as_str() {
            "linear" | "none" => Easing::Linear,
            "ease" => Easing::EASE,
            "easein" => Easing::EASE_IN,
            "easeout" => Easing::EASE_OUT,
            "easeinout" => Easing::EASE_IN_OUT,
            "inquad" | "easeinquad" => Easing::InQuad,
            "outquad" | "easeoutquad" => Easing::OutQuad,
            "inoutquad" | "easeinoutquad" => Easing::InOutQuad,
            "incubic" | "easeincubic" => Easing::InCubic,
            "outcubic" | "easeoutcubic" => Easing::OutCubic,
            "inoutcubic" | "easeinoutcubic" => Easing::InOutCubic,
            _ => return None,
        };
        Some(easing)
    }

    /// Resolve a curve by name, degrading unknown names to linear.
    pub fn named_or_linear(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown easing '{name}', falling back to linear");
            Easing::Linear
        })
    }

    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::InQuad => {
                let t = t.clamp(0.0, 1.0);
                t * t
            }
            Self::OutQuad => {
                let t = t.clamp(0.0, 1.0);
                1.0 - (1.0 - t) * (1.0 - t)
            }
            Self::InOutQuad => {
                let t = t.clamp(0.0, 1.0);
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::InCubic => {
                let t = t.clamp(0.0, 1.0);
                t * t * t
            }
            Self::OutCubic => {
                let t = t.clamp(0.0, 1.0);
                1.0 - (1.0 - t).powi(3)
            }
            Self::InOutCubic => {
                let t = t.clamp(0.0, 1.0);
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, *x1, *y1, *x2, *y2),
            Self::Custom(f) => f(t),
        }
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::InQuad => f.write_str("InQuad"),
            Self::OutQuad => f.write_str("OutQuad"),
            Self::InOutQuad => f.write_str("InOutQuad"),
            Self::InCubic => f.write_str("InCubic"),
            Self::OutCubic => f.write_str("OutCubic"),
            Self::InOutCubic => f.write_str("InOutCubic"),
            Self::CubicBezier(ctrl) => f.debug_tuple("CubicBezier").field(ctrl).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn parse_cubic_bezier(name: &str) -> Option<[f32; 4]> {
    let inner = name
        .strip_prefix("cubic-bezier(")
        .or_else(|| name.strip_prefix("cubicBezier("))?
        .strip_suffix(')')?;
    let parts: Vec<f32> = inner
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x1, y1, x2, y2] => Some([*x1, *y1, *x2, *y2]),
        _ => None,
    }
}
