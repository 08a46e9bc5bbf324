//! Clock collaborator contract and a frame-counting implementation.
//!
//! A clock converts time labels into frame counts and delivers per-frame
//! signals to subscribed animations. Timeline-bound animations listen on
//! [`Channel::Advance`], free-running ones on [`Channel::Tick`].
//!
//! Clock methods take `&self`: an animation unsubscribes and resubscribes
//! from inside its own signal handler when a cycle completes, so
//! implementations keep their bookkeeping behind interior mutability.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::ids::{IdAllocator, SubscriberId};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Free-running per-frame signal.
    Tick,
    /// Shared timeline signal carrying the timeline frame and a finished flag.
    Advance,
}

impl Channel {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::Advance => "advance",
        }
    }
}

/// One delivered clock signal.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClockSignal {
    Tick { frame: u32 },
    Advance { frame: u32, finished: bool },
}

impl ClockSignal {
    #[inline]
    pub fn channel(&self) -> Channel {
        match self {
            Self::Tick { .. } => Channel::Tick,
            Self::Advance { .. } => Channel::Advance,
        }
    }
}

/// Time source an animation subscribes to.
pub trait Clock {
    /// Convert a time label into a frame count, `None` if the label is not understood.
    fn frames_for(&self, label: &str) -> Option<u32>;
    /// Hand out an id the animation uses for all of its subscriptions.
    fn register(&self) -> SubscriberId;
    fn subscribe(&self, channel: Channel, subscriber: SubscriberId);
    fn unsubscribe(&self, channel: Channel, subscriber: SubscriberId);
}

/// Single-threaded clock with a fixed frame rate.
///
/// The host owns the animations and passes them in on every `tick`/`advance`;
/// only animations currently subscribed on the matching channel receive the signal.
#[derive(Debug)]
pub struct FrameClock {
    fps: f32,
    frame: Cell<u32>,
    ids: RefCell<IdAllocator>,
    subscriptions: RefCell<Vec<(Channel, SubscriberId)>>,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self {
            fps,
            frame: Cell::new(0),
            ids: RefCell::new(IdAllocator::new()),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Last frame emitted by this clock.
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame.get()
    }

    pub fn is_subscribed(&self, channel: Channel, subscriber: SubscriberId) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|(c, s)| *c == channel && *s == subscriber)
    }

    /// Number of live subscriptions held by `subscriber` across all channels.
    pub fn subscription_count(&self, subscriber: SubscriberId) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|(_, s)| *s == subscriber)
            .count()
    }

    /// Emit a free-running tick for the next frame.
    pub fn tick(&self, animations: &mut [&mut Animation]) -> u32 {
        let frame = self.frame.get().wrapping_add(1);
        self.frame.set(frame);
        self.dispatch(ClockSignal::Tick { frame }, animations);
        frame
    }

    /// Emit a timeline advance to `frame`.
    pub fn advance(&self, frame: u32, finished: bool, animations: &mut [&mut Animation]) {
        self.frame.set(frame);
        self.dispatch(ClockSignal::Advance { frame, finished }, animations);
    }

    fn dispatch(&self, signal: ClockSignal, animations: &mut [&mut Animation]) {
        let channel = signal.channel();
        // Snapshot so handlers may (un)subscribe while we deliver.
        let receivers: Vec<SubscriberId> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, s)| *s)
            .collect();
        for anim in animations.iter_mut() {
            if receivers.contains(&anim.subscriber_id()) {
                anim.on_signal(signal);
            }
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl Clock for FrameClock {
    /// Understands `"<n>ms"`, `"<n>s"`, `"<n>f"` and bare frame counts.
    fn frames_for(&self, label: &str) -> Option<u32> {
        let label = label.trim();
        let (number, scale) = if let Some(n) = label.strip_suffix("ms") {
            (n, self.fps / 1000.0)
        } else if let Some(n) = label.strip_suffix('s') {
            (n, self.fps)
        } else if let Some(n) = label.strip_suffix('f') {
            (n, 1.0)
        } else {
            (label, 1.0)
        };
        let value: f32 = number.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some((value * scale).round() as u32)
    }

    fn register(&self) -> SubscriberId {
        self.ids.borrow_mut().alloc_subscriber()
    }

    fn subscribe(&self, channel: Channel, subscriber: SubscriberId) {
        self.subscriptions.borrow_mut().push((channel, subscriber));
    }

    fn unsubscribe(&self, channel: Channel, subscriber: SubscriberId) {
        self.subscriptions
            .borrow_mut()
            .retain(|(c, s)| !(*c == channel && *s == subscriber));
    }
}
