//! Keyframe declarations and the normalized frame schedule.
//!
//! Labels resolve in priority order: numeric frame, `from`/`start` (frame 0),
//! `to`/`end` (the duration), `N%` of the duration, then the clock's time
//! conversion. A frame past the duration widens the duration; colliding
//! labels replace each other in declaration order.

use std::collections::BTreeMap;

use crate::clock::Clock;
use crate::easing::Easing;
use crate::error::TweenError;
use crate::value::PropertyMap;
use crate::Result;

#[derive(Clone, Debug, PartialEq)]
pub enum KeyLabel {
    Frame(u32),
    Text(String),
}

impl KeyLabel {
    /// Resolve this label to an absolute frame against the current duration.
    pub fn resolve(&self, duration: u32, clock: &dyn Clock) -> Result<u32> {
        let text = match self {
            KeyLabel::Frame(frame) => return Ok(*frame),
            KeyLabel::Text(text) => text.trim(),
        };
        if let Ok(frame) = text.parse::<u32>() {
            return Ok(frame);
        }
        match text.to_ascii_lowercase().as_str() {
            "from" | "start" => return Ok(0),
            "to" | "end" => return Ok(duration),
            _ => {}
        }
        if let Some(pct) = text.strip_suffix('%') {
            if let Ok(pct) = pct.trim().parse::<f32>() {
                if pct.is_finite() && pct >= 0.0 {
                    return Ok((duration as f32 * pct / 100.0).round() as u32);
                }
            }
        }
        clock
            .frames_for(text)
            .ok_or_else(|| TweenError::UnresolvedLabel {
                label: text.to_string(),
            })
    }
}

impl From<u32> for KeyLabel {
    fn from(frame: u32) -> Self {
        KeyLabel::Frame(frame)
    }
}

impl From<&str> for KeyLabel {
    fn from(label: &str) -> Self {
        KeyLabel::Text(label.to_string())
    }
}

impl From<String> for KeyLabel {
    fn from(label: String) -> Self {
        KeyLabel::Text(label)
    }
}

/// One declared keyframe: a label, the property snapshot at that point and an
/// optional easing for the segment arriving at it.
#[derive(Clone, Debug)]
pub struct KeyframeSpec {
    pub label: KeyLabel,
    pub values: PropertyMap,
    pub easing: Option<Easing>,
}

impl KeyframeSpec {
    pub fn new(label: impl Into<KeyLabel>, values: PropertyMap) -> Self {
        Self {
            label: label.into(),
            values,
            easing: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

impl<L: Into<KeyLabel>> From<(L, PropertyMap)> for KeyframeSpec {
    fn from((label, values): (L, PropertyMap)) -> Self {
        KeyframeSpec::new(label, values)
    }
}

/// A keyframe placed on an absolute frame.
#[derive(Clone, Debug, Default)]
pub struct Keyframe {
    pub values: PropertyMap,
    pub easing: Option<Easing>,
}

/// Normalized keyframes shared by every subject bound to one animation.
#[derive(Clone, Debug)]
pub struct Schedule {
    duration: u32,
    keyframes: BTreeMap<u32, Keyframe>,
    tracked: Vec<String>,
    filled: bool,
}

impl Schedule {
    /// Resolve declared labels against `duration` and the clock.
    pub fn normalize<I>(duration: u32, specs: I, clock: &dyn Clock) -> Result<Self>
    where
        I: IntoIterator<Item = KeyframeSpec>,
    {
        let mut duration = duration;
        let mut keyframes = BTreeMap::new();
        for spec in specs {
            let frame = spec.label.resolve(duration, clock)?;
            if frame > duration {
                log::debug!("keyframe {:?} widens duration {duration} -> {frame}", spec.label);
                duration = frame;
            }
            keyframes.insert(
                frame,
                Keyframe {
                    values: spec.values,
                    easing: spec.easing,
                },
            );
        }

        let mut tracked: Vec<String> = Vec::new();
        for kf in keyframes.values() {
            for name in kf.values.keys() {
                if !tracked.contains(name) {
                    tracked.push(name.clone());
                }
            }
        }
        tracked.sort();

        Ok(Self {
            duration,
            keyframes,
            tracked,
            filled: false,
        })
    }

    #[inline]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Ascending unique keyframe frames.
    pub fn sorted_keys(&self) -> Vec<u32> {
        self.keyframes.keys().copied().collect()
    }

    pub fn keyframe(&self, frame: u32) -> Option<&Keyframe> {
        self.keyframes.get(&frame)
    }

    pub(crate) fn keyframe_mut(&mut self, frame: u32) -> Option<&mut Keyframe> {
        self.keyframes.get_mut(&frame)
    }

    /// Union of property names referenced by any keyframe, sorted.
    pub fn tracked_properties(&self) -> &[String] {
        &self.tracked
    }

    /// Values declared at frame 0, if any.
    pub fn initial_overrides(&self) -> Option<&PropertyMap> {
        self.keyframes.get(&0).map(|kf| &kf.values)
    }

    /// Fraction of the duration at which `frame` sits.
    pub fn progress_of(&self, frame: u32) -> f32 {
        if self.duration == 0 {
            1.0
        } else {
            frame as f32 / self.duration as f32
        }
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub(crate) fn mark_filled(&mut self) {
        self.filled = true;
    }
}
