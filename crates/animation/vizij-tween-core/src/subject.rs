//! Subjects and the strategies used to read and write their properties.
//!
//! A subject is anything with animatable properties. It is shared with the
//! host as a [`SubjectRef`]; the animation only reads it when binding and
//! writes it on every step.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::{PropertyMap, Value};

/// Shared handle to a bound subject. Identity (`Rc::ptr_eq`) is used for removal.
pub type SubjectRef = Rc<RefCell<dyn Subject>>;

/// Wrap a concrete subject into a [`SubjectRef`].
pub fn subject_ref<S: Subject + 'static>(subject: S) -> SubjectRef {
    Rc::new(RefCell::new(subject))
}

pub trait Subject {
    /// Attribute accessor, read side: all current attributes.
    fn attr(&self) -> PropertyMap;

    /// Attribute accessor, write side: merge `values` into the attributes.
    fn set_attr(&mut self, values: &PropertyMap);

    /// Discrete property read.
    fn prop(&self, name: &str) -> Option<Value> {
        self.attr().remove(name)
    }

    /// Discrete property write.
    fn set_prop(&mut self, name: &str, value: &Value) {
        let mut single = PropertyMap::new();
        single.insert(name.to_string(), value.clone());
        self.set_attr(&single);
    }
}

/// Caller-supplied get/set pair.
pub trait SubjectAdapter {
    fn get(&self, subject: &dyn Subject, names: &[String]) -> PropertyMap;
    fn set(&self, subject: &mut dyn Subject, values: &PropertyMap);
}

/// How a binding reads and writes its subject.
#[derive(Clone, Default)]
pub enum Strategy {
    /// One accessor for both reading and writing the whole attribute map.
    #[default]
    Attribute,
    /// Named property reads and writes, one property at a time.
    DiscreteProperty,
    Custom(Rc<dyn SubjectAdapter>),
}

impl Strategy {
    /// Resolve a strategy name from configuration data. Unknown names keep the default.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "attr" | "attribute" => Some(Self::Attribute),
            "prop" | "property" | "discrete-property" | "discrete_property" => {
                Some(Self::DiscreteProperty)
            }
            _ => None,
        }
    }

    /// Read the tracked `names` from `subject`. Missing properties are omitted.
    pub fn get(&self, subject: &dyn Subject, names: &[String]) -> PropertyMap {
        match self {
            Self::Attribute => {
                let mut all = subject.attr();
                all.retain(|k, _| names.contains(k));
                all
            }
            Self::DiscreteProperty => names
                .iter()
                .filter_map(|n| subject.prop(n).map(|v| (n.clone(), v)))
                .collect(),
            Self::Custom(adapter) => adapter.get(subject, names),
        }
    }

    pub fn set(&self, subject: &mut dyn Subject, values: &PropertyMap) {
        match self {
            Self::Attribute => subject.set_attr(values),
            Self::DiscreteProperty => {
                for (name, value) in values {
                    subject.set_prop(name, value);
                }
            }
            Self::Custom(adapter) => adapter.set(subject, values),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => f.write_str("Attribute"),
            Self::DiscreteProperty => f.write_str("DiscreteProperty"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Plain property bag usable as a subject, mostly for hosts and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    pub values: PropertyMap,
    /// Number of writes received, handy to observe stepping.
    pub writes: usize,
}

impl PropertyBag {
    pub fn new(values: PropertyMap) -> Self {
        Self { values, writes: 0 }
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.values.get(name).and_then(Value::as_scalar)
    }
}

impl Subject for PropertyBag {
    fn attr(&self) -> PropertyMap {
        self.values.clone()
    }

    fn set_attr(&mut self, values: &PropertyMap) {
        self.writes += 1;
        for (k, v) in values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    fn prop(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn set_prop(&mut self, name: &str, value: &Value) {
        self.writes += 1;
        self.values.insert(name.to_string(), value.clone());
    }
}
