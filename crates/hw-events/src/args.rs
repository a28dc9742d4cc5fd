//! Typed event arguments.
//!
//! The host delivers every event as a set of named values. `EventArgs`
//! keeps them in a sorted map and offers typed accessors that fail with
//! an [`ArgError`] when a key is missing or carries the wrong kind.
//!
//! # Example
//!
//! ```
//! use hw_events::{ActorId, EventArgs, EventValue};
//!
//! let args = EventArgs::new()
//!     .with("player", EventValue::Actor(ActorId(3)))
//!     .with("damage", EventValue::Long(40));
//! assert_eq!(args.player().unwrap(), ActorId(3));
//! assert_eq!(args.long("damage").unwrap(), 40);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::actor::ActorId;
use crate::geometry::Vec3;

/// Key under which the host passes the acting player.
pub const PLAYER_KEY: &str = "player";

/// The kind of a single event value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Short,
    Long,
    Float,
    Bool,
    Actor,
    Vector,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Short => "short",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Actor => "actor",
            ValueKind::Vector => "vector",
        };
        f.write_str(name)
    }
}

/// A single named value carried by an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventValue {
    String(String),
    Short(i16),
    Long(i32),
    Float(f32),
    Bool(bool),
    Actor(ActorId),
    Vector(Vec3),
}

impl EventValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            EventValue::String(_) => ValueKind::String,
            EventValue::Short(_) => ValueKind::Short,
            EventValue::Long(_) => ValueKind::Long,
            EventValue::Float(_) => ValueKind::Float,
            EventValue::Bool(_) => ValueKind::Bool,
            EventValue::Actor(_) => ValueKind::Actor,
            EventValue::Vector(_) => ValueKind::Vector,
        }
    }
}

impl From<&str> for EventValue {
    fn from(value: &str) -> Self {
        EventValue::String(value.to_string())
    }
}

impl From<String> for EventValue {
    fn from(value: String) -> Self {
        EventValue::String(value)
    }
}

impl From<i16> for EventValue {
    fn from(value: i16) -> Self {
        EventValue::Short(value)
    }
}

impl From<i32> for EventValue {
    fn from(value: i32) -> Self {
        EventValue::Long(value)
    }
}

impl From<f32> for EventValue {
    fn from(value: f32) -> Self {
        EventValue::Float(value)
    }
}

impl From<bool> for EventValue {
    fn from(value: bool) -> Self {
        EventValue::Bool(value)
    }
}

impl From<ActorId> for EventValue {
    fn from(value: ActorId) -> Self {
        EventValue::Actor(value)
    }
}

impl From<Vec3> for EventValue {
    fn from(value: Vec3) -> Self {
        EventValue::Vector(value)
    }
}

/// Errors raised by typed argument access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("missing event argument '{0}'")]
    Missing(String),

    #[error("event argument '{key}' should be {expected}, found {found}")]
    WrongKind {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("event argument '{key}' value {value} does not fit a short")]
    OutOfRange { key: String, value: i64 },
}

/// Named arguments of one event invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventArgs {
    values: BTreeMap<String, EventValue>,
}

impl EventArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<EventValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts `value` as a short, failing when it does not fit.
    pub fn with_short(self, key: &str, value: impl Into<i64>) -> Result<Self, ArgError> {
        let value = value.into();
        let short = i16::try_from(value).map_err(|_| ArgError::OutOfRange {
            key: key.to_string(),
            value,
        })?;
        Ok(self.with(key, short))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EventValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the value for `key` or [`ArgError::Missing`].
    pub fn require(&self, key: &str) -> Result<&EventValue, ArgError> {
        self.values
            .get(key)
            .ok_or_else(|| ArgError::Missing(key.to_string()))
    }

    pub fn actor(&self, key: &str) -> Result<ActorId, ArgError> {
        match self.require(key)? {
            EventValue::Actor(id) => Ok(*id),
            other => Err(wrong_kind(key, ValueKind::Actor, other)),
        }
    }

    /// The acting player, passed by the host under `player`.
    pub fn player(&self) -> Result<ActorId, ArgError> {
        self.actor(PLAYER_KEY)
    }

    pub fn string(&self, key: &str) -> Result<&str, ArgError> {
        match self.require(key)? {
            EventValue::String(s) => Ok(s.as_str()),
            other => Err(wrong_kind(key, ValueKind::String, other)),
        }
    }

    pub fn short(&self, key: &str) -> Result<i16, ArgError> {
        match self.require(key)? {
            EventValue::Short(v) => Ok(*v),
            other => Err(wrong_kind(key, ValueKind::Short, other)),
        }
    }

    /// Integer access; shorts widen to long.
    pub fn long(&self, key: &str) -> Result<i32, ArgError> {
        match self.require(key)? {
            EventValue::Long(v) => Ok(*v),
            EventValue::Short(v) => Ok(i32::from(*v)),
            other => Err(wrong_kind(key, ValueKind::Long, other)),
        }
    }

    /// Float access; integers widen to float.
    pub fn float(&self, key: &str) -> Result<f32, ArgError> {
        match self.require(key)? {
            EventValue::Float(v) => Ok(*v),
            EventValue::Long(v) => Ok(*v as f32),
            EventValue::Short(v) => Ok(f32::from(*v)),
            other => Err(wrong_kind(key, ValueKind::Float, other)),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool, ArgError> {
        match self.require(key)? {
            EventValue::Bool(v) => Ok(*v),
            other => Err(wrong_kind(key, ValueKind::Bool, other)),
        }
    }

    pub fn vector(&self, key: &str) -> Result<Vec3, ArgError> {
        match self.require(key)? {
            EventValue::Vector(v) => Ok(*v),
            other => Err(wrong_kind(key, ValueKind::Vector, other)),
        }
    }
}

fn wrong_kind(key: &str, expected: ValueKind, found: &EventValue) -> ArgError {
    ArgError::WrongKind {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
