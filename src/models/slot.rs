//! Strictly-typed slot values and the slot cell itself.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::coerce::{self, CoerceError, composite, duration};
use crate::models::{SlotKind, Source, Value};

/// A value that always matches one of the supported slot kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlotValue {
    Int(i32),
    Int64(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Duration(#[serde(serialize_with = "duration::serialize")] Duration),
    List(Vec<String>),
    Map(HashMap<String, String>),
}

impl SlotValue {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotValue::Int(_) => SlotKind::Int,
            SlotValue::Int64(_) => SlotKind::Int64,
            SlotValue::Float(_) => SlotKind::Float,
            SlotValue::String(_) => SlotKind::String,
            SlotValue::Bool(_) => SlotKind::Bool,
            SlotValue::Duration(_) => SlotKind::Duration,
            SlotValue::List(_) => SlotKind::List,
            SlotValue::Map(_) => SlotKind::Map,
        }
    }
}

/// Textual form, as accepted back by the flag parser.
impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Int(v) => write!(f, "{v}"),
            SlotValue::Int64(v) => write!(f, "{v}"),
            SlotValue::Float(v) => write!(f, "{v}"),
            SlotValue::String(v) => write!(f, "{v}"),
            SlotValue::Bool(v) => write!(f, "{v}"),
            SlotValue::Duration(v) => write!(f, "{}", duration::format(*v)),
            SlotValue::List(v) => write!(f, "{}", composite::join_list(v)),
            SlotValue::Map(v) => write!(f, "{}", composite::join_pairs(v)),
        }
    }
}

/// A named, typed, mutable configuration cell.
///
/// The kind is fixed by the default given at construction; every later
/// assignment goes through coercion to that kind, so `value` can never
/// hold a value of another kind.
#[derive(Debug, Clone)]
pub struct Slot {
    name: String,
    usage: String,
    default: SlotValue,
    value: SlotValue,
    source: Source,
}

impl Slot {
    pub fn new(name: impl Into<String>, default: SlotValue, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            value: default.clone(),
            default,
            source: Source::Default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn kind(&self) -> SlotKind {
        self.default.kind()
    }

    pub fn default_value(&self) -> &SlotValue {
        &self.default
    }

    pub fn value(&self) -> &SlotValue {
        &self.value
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Flag-style assignment from raw text.
    ///
    /// Scalars are replaced; list tokens are appended; map pairs are merged.
    pub fn set_str(&mut self, raw: &str, source: Source) -> Result<(), CoerceError> {
        let incoming = coerce::coerce_str(self.kind(), raw)?;
        self.assign(incoming, source);
        Ok(())
    }

    /// File-style assignment from a decoded value, with the same
    /// replace/append/merge rules as [`Slot::set_str`].
    pub fn apply(&mut self, value: &Value, source: Source) -> Result<(), CoerceError> {
        let incoming = coerce::coerce(self.kind(), value)?;
        self.assign(incoming, source);
        Ok(())
    }

    /// Environment-style assignment: the parsed value replaces the current
    /// one outright, composites included.
    pub fn override_str(&mut self, raw: &str, source: Source) -> Result<(), CoerceError> {
        let incoming = coerce::coerce_str(self.kind(), raw)?;
        self.replace(incoming, source);
        Ok(())
    }

    /// Replace the current value. `incoming` must already be of this slot's kind.
    pub(crate) fn replace(&mut self, incoming: SlotValue, source: Source) {
        debug_assert_eq!(incoming.kind(), self.kind());
        self.value = incoming;
        self.source = source;
    }

    fn assign(&mut self, incoming: SlotValue, source: Source) {
        debug_assert_eq!(incoming.kind(), self.kind());
        match (&mut self.value, incoming) {
            (SlotValue::List(current), SlotValue::List(items)) => current.extend(items),
            (SlotValue::Map(current), SlotValue::Map(pairs)) => current.extend(pairs),
            (current, scalar) => *current = scalar,
        }
        self.source = source;
    }
}

/// Detached copy of a slot's state, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub name: String,
    pub kind: SlotKind,
    pub value: SlotValue,
    pub default: SlotValue,
    pub source: Source,
    pub usage: String,
}

impl From<&Slot> for SlotView {
    fn from(slot: &Slot) -> Self {
        Self {
            name: slot.name.clone(),
            kind: slot.kind(),
            value: slot.value.clone(),
            default: slot.default.clone(),
            source: slot.source,
            usage: slot.usage.clone(),
        }
    }
}
