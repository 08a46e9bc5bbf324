//! Playback phase and per-animation playback counters.

use serde::{Deserialize, Serialize};

/// Coarse lifecycle phase of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Never played, or reset
    Stopped,
    Playing,
    Paused,
    /// Finished its last cycle and emitted `end`
    Completed,
}

impl PlaybackPhase {
    /// Get the name of this playback phase
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

/// Mutable playback counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Frames elapsed in the current cycle.
    pub frame: u32,
    /// Clock frame seen on the previous stepped signal; `None` until one arrives.
    pub prev_frame: Option<u32>,
    /// Signals still to swallow before stepping.
    pub current_delay: u32,
    /// Active segment index, shared by every bound subject.
    pub current_tween: usize,
    pub is_playing: bool,
    /// Finite repeats left after the current cycle.
    pub repeat_counter: u32,
}

impl PlaybackState {
    pub fn new(delay: u32, repeat_counter: u32) -> Self {
        Self {
            current_delay: delay,
            repeat_counter,
            ..Self::default()
        }
    }

    /// Frames elapsed since the last observed timeline frame, 1 when unknown
    /// or when the timeline did not move forward.
    #[inline]
    pub fn elapsed_since(&self, reported: u32) -> u32 {
        match self.prev_frame {
            Some(prev) if reported > prev => reported - prev,
            _ => 1,
        }
    }
}
