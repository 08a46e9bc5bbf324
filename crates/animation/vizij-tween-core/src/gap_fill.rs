//! Property gap-filling across keyframes.
//!
//! Every tracked property must be defined at every non-zero keyframe before
//! segments are built. A missing value is interpolated between the nearest
//! defining keyframe before it (or the subject's initial value) and the
//! nearest defining keyframe after it. With nothing after it, the value holds
//! until a synthetic end frame at the duration.
//!
//! Frame 0 is left alone: each subject anchors on its own snapshot merged with
//! the frame-0 overrides, and that anchor must cover every tracked property.

use crate::easing::Easing;
use crate::error::TweenError;
use crate::interp::Tween;
use crate::schedule::Schedule;
use crate::value::{PropertyMap, Value};
use crate::Result;

struct Neighbor {
    frame: u32,
    value: Value,
    easing: Option<Easing>,
}

/// Fill missing properties in `schedule` using `initial` as the fallback for
/// values before the first defining keyframe.
pub fn fill_gaps(schedule: &mut Schedule, initial: &PropertyMap) -> Result<()> {
    let keys = schedule.sorted_keys();
    let tracked = schedule.tracked_properties().to_vec();

    for name in &tracked {
        for (idx, &frame) in keys.iter().enumerate() {
            if frame == 0 || defines(schedule, frame, name) {
                continue;
            }

            let before = keys[..idx]
                .iter()
                .rev()
                .find_map(|&f| neighbor(schedule, f, name))
                .or_else(|| {
                    initial.get(name).map(|v| Neighbor {
                        frame: 0,
                        value: v.clone(),
                        easing: None,
                    })
                })
                .ok_or_else(|| TweenError::MissingProperty {
                    property: name.clone(),
                    frame,
                })?;

            let after = keys[idx + 1..]
                .iter()
                .find_map(|&f| neighbor(schedule, f, name))
                .unwrap_or_else(|| Neighbor {
                    frame: schedule.duration().max(frame),
                    value: before.value.clone(),
                    easing: None,
                });

            let span = after.frame.saturating_sub(before.frame);
            let progress = if span == 0 {
                1.0
            } else {
                (frame - before.frame) as f32 / span as f32
            };
            let tween = Tween::new(
                single(name, before.value),
                single(name, after.value),
                after.easing,
            );
            let mut filled = tween.at(progress);
            if let (Some(value), Some(kf)) = (filled.remove(name), schedule.keyframe_mut(frame)) {
                log::trace!("gap-filled '{name}' at frame {frame}");
                kf.values.insert(name.clone(), value);
            }
        }
    }

    schedule.mark_filled();
    Ok(())
}

/// Require a subject's frame-0 anchor to define every tracked property.
///
/// The anchor is the `from` side of the first segment; a property missing
/// there has no value before its first keyframe.
pub fn ensure_anchor_complete(schedule: &Schedule, anchor: &PropertyMap) -> Result<()> {
    match schedule
        .tracked_properties()
        .iter()
        .find(|name| !anchor.contains_key(*name))
    {
        Some(name) => Err(TweenError::MissingProperty {
            property: name.clone(),
            frame: 0,
        }),
        None => Ok(()),
    }
}

fn defines(schedule: &Schedule, frame: u32, name: &str) -> bool {
    schedule
        .keyframe(frame)
        .is_some_and(|kf| kf.values.contains_key(name))
}

fn neighbor(schedule: &Schedule, frame: u32, name: &str) -> Option<Neighbor> {
    let kf = schedule.keyframe(frame)?;
    kf.values.get(name).map(|v| Neighbor {
        frame,
        value: v.clone(),
        easing: kf.easing.clone(),
    })
}

fn single(name: &str, value: Value) -> PropertyMap {
    let mut map = PropertyMap::new();
    map.insert(name.to_string(), value);
    map
}
