//! Tween configuration.
//!
//! Plain data options (`easing`, `strategy`, `delay`, `repeat`,
//! `isTimelineBound`) deserialize into [`TweenOptions`]. Everything that cannot
//! live in data (subjects, easing functions, custom strategies, event
//! handlers) is attached on the [`AnimationConfig`] builder.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::animation::Animation;
use crate::clock::Clock;
use crate::easing::Easing;
use crate::error::TweenError;
use crate::events::Handler;
use crate::subject::{Strategy, SubjectRef};
use crate::Result;

const KNOWN_KEYS: &[&str] = &["easing", "strategy", "delay", "repeat", "isTimelineBound"];

/// Frame count or a time label the clock converts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Frames(u32),
    Label(String),
}

impl TimeSpec {
    pub fn zero() -> Self {
        TimeSpec::Frames(0)
    }

    pub fn resolve(&self, clock: &dyn Clock) -> Result<u32> {
        match self {
            TimeSpec::Frames(n) => Ok(*n),
            TimeSpec::Label(label) => {
                clock
                    .frames_for(label)
                    .ok_or_else(|| TweenError::UnresolvedLabel {
                        label: label.clone(),
                    })
            }
        }
    }
}

impl Default for TimeSpec {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u32> for TimeSpec {
    fn from(frames: u32) -> Self {
        TimeSpec::Frames(frames)
    }
}

impl From<&str> for TimeSpec {
    fn from(label: &str) -> Self {
        TimeSpec::Label(label.to_string())
    }
}

/// How many extra play-throughs follow the first one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRepeat", into = "RawRepeat")]
pub enum Repeat {
    Count(u32),
    Unlimited,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRepeat {
    Count(u32),
    Flag(bool),
    Text(String),
}

impl TryFrom<RawRepeat> for Repeat {
    type Error = String;

    fn try_from(raw: RawRepeat) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawRepeat::Count(n) => Ok(Repeat::Count(n)),
            RawRepeat::Flag(true) => Ok(Repeat::Unlimited),
            RawRepeat::Flag(false) => Ok(Repeat::Count(0)),
            RawRepeat::Text(s) => match s.to_ascii_lowercase().as_str() {
                "infinite" | "unlimited" | "forever" => Ok(Repeat::Unlimited),
                other => other
                    .parse::<u32>()
                    .map(Repeat::Count)
                    .map_err(|_| format!("invalid repeat value '{s}'")),
            },
        }
    }
}

impl From<Repeat> for RawRepeat {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Count(n) => RawRepeat::Count(n),
            Repeat::Unlimited => RawRepeat::Text("infinite".to_string()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Data part of the tween configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweenOptions {
    #[serde(default)]
    pub easing: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub delay: TimeSpec,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default = "default_true")]
    pub is_timeline_bound: bool,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            easing: None,
            strategy: None,
            delay: TimeSpec::zero(),
            repeat: Repeat::default(),
            is_timeline_bound: true,
        }
    }
}

/// One raw configuration entry as handed over by a host.
pub enum ConfigEntry {
    Data(JsonValue),
    Callback(Handler<Animation>),
}

impl ConfigEntry {
    pub fn callback(f: impl FnMut(&Animation) + 'static) -> Self {
        ConfigEntry::Callback(Box::new(f))
    }
}

impl From<JsonValue> for ConfigEntry {
    fn from(value: JsonValue) -> Self {
        ConfigEntry::Data(value)
    }
}

/// Full configuration for [`Animation::new`].
#[derive(Default)]
pub struct AnimationConfig {
    pub options: TweenOptions,
    /// Takes precedence over `options.easing`.
    pub easing: Option<Easing>,
    /// Takes precedence over `options.strategy`.
    pub strategy: Option<Strategy>,
    pub subjects: Vec<SubjectRef>,
    pub handlers: Vec<(String, Handler<Animation>)>,
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from raw entries in two passes: `on<Event>`
    /// callables are collected as handlers first, then the remaining data
    /// entries are deserialized into [`TweenOptions`].
    pub fn from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigEntry)>,
    {
        let mut handlers = Vec::new();
        let mut data = Vec::new();
        for (key, entry) in entries {
            let key = key.into();
            match entry {
                ConfigEntry::Callback(handler) => match event_name(&key) {
                    Some(name) => handlers.push((name, handler)),
                    None => log::warn!("ignoring callable config entry '{key}'"),
                },
                ConfigEntry::Data(value) => data.push((key, value)),
            }
        }

        let mut cleaned = Map::new();
        for (key, value) in data {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("unknown tween option '{key}'");
            }
            cleaned.insert(key, value);
        }
        let options: TweenOptions = serde_json::from_value(JsonValue::Object(cleaned))
            .map_err(|e| TweenError::InvalidOptions {
                reason: e.to_string(),
            })?;

        Ok(Self {
            options,
            handlers,
            ..Self::default()
        })
    }

    /// Build a configuration from a JSON object of data options.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => {
                Self::from_entries(map.into_iter().map(|(k, v)| (k, ConfigEntry::Data(v))))
            }
            JsonValue::Null => Ok(Self::default()),
            other => Err(TweenError::InvalidOptions {
                reason: format!("expected an object, got {other}"),
            }),
        }
    }

    /// Parse JSON text, then read it as with [`AnimationConfig::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_easing_name(mut self, name: &str) -> Self {
        self.options.easing = Some(name.to_string());
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_subject(mut self, subject: SubjectRef) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = SubjectRef>) -> Self {
        self.subjects.extend(subjects);
        self
    }

    pub fn with_delay(mut self, delay: impl Into<TimeSpec>) -> Self {
        self.options.delay = delay.into();
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.options.repeat = repeat;
        self
    }

    pub fn timeline_bound(mut self, bound: bool) -> Self {
        self.options.is_timeline_bound = bound;
        self
    }

    pub fn on(mut self, name: &str, handler: impl FnMut(&Animation) + 'static) -> Self {
        self.handlers
            .push((name.to_ascii_lowercase(), Box::new(handler)));
        self
    }

    /// Easing to apply to whole-timeline progress; unknown names resolve to none.
    pub fn resolved_easing(&self) -> Option<Easing> {
        if let Some(easing) = &self.easing {
            return Some(easing.clone());
        }
        self.options
            .easing
            .as_deref()
            .map(Easing::named_or_linear)
            .filter(|e| !e.is_linear())
    }

    pub fn resolved_strategy(&self) -> Strategy {
        if let Some(strategy) = &self.strategy {
            return strategy.clone();
        }
        match self.options.strategy.as_deref() {
            Some(name) => Strategy::from_name(name).unwrap_or_else(|| {
                log::warn!("unknown strategy '{name}', using attribute accessor");
                Strategy::Attribute
            }),
            None => Strategy::Attribute,
        }
    }
}

impl fmt::Debug for AnimationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("options", &self.options)
            .field("easing", &self.easing)
            .field("strategy", &self.strategy)
            .field("subjects", &self.subjects.len())
            .field(
                "handlers",
                &self.handlers.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// `onBegin` → `begin`; `None` if the key is not an `on<Event>` key.
fn event_name(key: &str) -> Option<String> {
    let rest = key.strip_prefix("on")?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase())
}
