//! Segment construction.
//!
//! One segment per non-zero keyframe. Segment `i` runs from the previous
//! keyframe (or the subject's anchor for `i == 0`) to keyframe `i`, over the
//! progress window `[prev / duration, key / duration)`. Windows are contiguous.

use crate::error::TweenError;
use crate::interp::Tween;
use crate::schedule::Schedule;
use crate::value::PropertyMap;
use crate::Result;

const WINDOW_EPS: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct Segment {
    pub start_progress: f32,
    pub end_progress: f32,
    tween: Tween,
}

impl Segment {
    #[inline]
    pub fn window(&self) -> (f32, f32) {
        (self.start_progress, self.end_progress)
    }

    #[inline]
    pub fn is_zero_length(&self) -> bool {
        self.end_progress - self.start_progress <= 0.0
    }

    /// Phase-local progress for whole-timeline `progress`; `None` for a zero-length window.
    pub fn local_progress(&self, progress: f32) -> Option<f32> {
        if self.is_zero_length() {
            return None;
        }
        Some((progress - self.start_progress) / (self.end_progress - self.start_progress))
    }

    pub fn at(&self, local_progress: f32) -> PropertyMap {
        self.tween.at(local_progress)
    }

    pub fn from_values(&self) -> &PropertyMap {
        self.tween.from_values()
    }

    pub fn to_values(&self) -> &PropertyMap {
        self.tween.to_values()
    }
}

/// Build the segment list for one subject whose frame-0 state is `anchor`.
pub fn build_segments(schedule: &Schedule, anchor: &PropertyMap) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut from = anchor.clone();
    let mut start_progress = 0.0;
    for frame in schedule.sorted_keys() {
        if frame == 0 {
            continue;
        }
        let Some(kf) = schedule.keyframe(frame) else {
            continue;
        };
        let end_progress = schedule.progress_of(frame);
        segments.push(Segment {
            start_progress,
            end_progress,
            tween: Tween::new(from, kf.values.clone(), kf.easing.clone()),
        });
        from = kf.values.clone();
        start_progress = end_progress;
    }
    segments
}

/// Reject a segment list whose count or windows differ from `reference`.
pub fn ensure_same_layout(reference: &[Segment], candidate: &[Segment]) -> Result<()> {
    let same = reference.len() == candidate.len()
        && reference.iter().zip(candidate).all(|(a, b)| {
            (a.start_progress - b.start_progress).abs() <= WINDOW_EPS
                && (a.end_progress - b.end_progress).abs() <= WINDOW_EPS
        });
    if same {
        Ok(())
    } else {
        Err(TweenError::SegmentMismatch {
            expected: reference.iter().map(Segment::window).collect(),
            actual: candidate.iter().map(Segment::window).collect(),
        })
    }
}
