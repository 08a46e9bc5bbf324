//! Event system for playback notifications.
//!
//! [`EventHub`] is a plain name → handlers registry that a type embeds; the
//! [`Observable`] trait gives the embedding type `on`/`off` for free. Names are
//! matched lower-cased.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Playback notifications emitted by an animation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EventKind {
    /// First play at frame 0
    Begin,
    /// Every play call
    Play,
    Pause,
    /// Natural completion with no repeats pending
    End,
    Custom(String),
}

impl EventKind {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Begin => "begin",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::End => "end",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "begin" => Self::Begin,
            "play" => Self::Play,
            "pause" => Self::Pause,
            "end" => Self::End,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

pub type Handler<T> = Box<dyn FnMut(&T)>;

pub struct EventHub<T> {
    handlers: HashMap<String, Vec<Handler<T>>>,
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<T> EventHub<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, name: &str, handler: Handler<T>) {
        self.handlers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(handler);
    }

    /// Drop every handler registered under `name`, returning how many were removed.
    pub fn off(&mut self, name: &str) -> usize {
        self.handlers
            .remove(&name.to_ascii_lowercase())
            .map_or(0, |v| v.len())
    }

    /// Call the handlers registered under `name` in registration order.
    pub fn emit(&mut self, name: &str, payload: &T) -> usize {
        match self.handlers.get_mut(&name.to_ascii_lowercase()) {
            Some(list) => {
                for handler in list.iter_mut() {
                    handler(payload);
                }
                list.len()
            }
            None => 0,
        }
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.handlers
            .get(&name.to_ascii_lowercase())
            .map_or(0, Vec::len)
    }
}

impl<T> fmt::Debug for EventHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&String, usize)> =
            self.handlers.iter().map(|(k, v)| (k, v.len())).collect();
        counts.sort();
        f.debug_struct("EventHub").field("handlers", &counts).finish()
    }
}

/// Subscribe/unsubscribe surface for any type embedding an [`EventHub`] of itself.
pub trait Observable: Sized {
    fn events_mut(&mut self) -> &mut EventHub<Self>;

    fn on(&mut self, name: &str, handler: impl FnMut(&Self) + 'static) {
        self.events_mut().on(name, Box::new(handler));
    }

    fn off(&mut self, name: &str) -> usize {
        self.events_mut().off(name)
    }
}
