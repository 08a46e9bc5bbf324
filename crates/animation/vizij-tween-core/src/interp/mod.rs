//! Interpolation primitive.
//!
//! A [`Tween`] is built from two property maps and an optional easing and
//! answers `at(progress)` with the interpolated map. Properties present on
//! only one side pass through unchanged.

pub mod functions;

use crate::easing::Easing;
use crate::value::PropertyMap;
use functions::linear_value;

#[derive(Clone, Debug)]
pub struct Tween {
    from: PropertyMap,
    to: PropertyMap,
    easing: Option<Easing>,
}

impl Tween {
    pub fn new(from: PropertyMap, to: PropertyMap, easing: Option<Easing>) -> Self {
        Self { from, to, easing }
    }

    pub fn from_values(&self) -> &PropertyMap {
        &self.from
    }

    pub fn to_values(&self) -> &PropertyMap {
        &self.to
    }

    pub fn at(&self, progress: f32) -> PropertyMap {
        let t = match &self.easing {
            Some(easing) => easing.apply(progress),
            None => progress,
        };
        let mut out = PropertyMap::new();
        for (name, a) in &self.from {
            let value = match self.to.get(name) {
                Some(b) => linear_value(a, b, t),
                None => a.clone(),
            };
            out.insert(name.clone(), value);
        }
        for (name, b) in &self.to {
            if !out.contains_key(name) {
                out.insert(name.clone(), b.clone());
            }
        }
        out
    }
}
