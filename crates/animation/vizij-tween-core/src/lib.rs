//! Vizij Tween Core (engine-agnostic)
//!
//! Frame-driven keyframe tweening: keyframe labels are normalized onto a frame
//! schedule, missing properties are gap-filled, and per-subject segments are
//! stepped on every clock signal with easing and phase transitions between
//! segments. Clocks, subjects and event handlers are supplied by the host.

pub mod animation;
pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod events;
pub mod gap_fill;
pub mod ids;
pub mod interp;
pub mod playback;
pub mod schedule;
pub mod segments;
pub mod subject;
pub mod value;

// Re-exports for consumers (adapters)
pub use animation::Animation;
pub use clock::{Channel, Clock, ClockSignal, FrameClock};
pub use config::{AnimationConfig, ConfigEntry, Repeat, TimeSpec, TweenOptions};
pub use easing::Easing;
pub use error::TweenError;
pub use events::{EventHub, EventKind, Observable};
pub use ids::SubscriberId;
pub use interp::Tween;
pub use playback::{PlaybackPhase, PlaybackState};
pub use schedule::{KeyLabel, Keyframe, KeyframeSpec, Schedule};
pub use segments::Segment;
pub use subject::{subject_ref, PropertyBag, Strategy, Subject, SubjectAdapter, SubjectRef};
pub use value::{props, PropertyMap, Value, ValueKind};

/// Result type for tween setup.
pub type Result<T> = core::result::Result<T, TweenError>;
