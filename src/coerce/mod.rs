//! Type-directed coercion from decoded values to slot values.
//!
//! [`coerce`] is a pure function of (target kind, input value). Every raw
//! string source (environment, flags, INI) goes through the same path as a
//! [`Value::String`], so there is exactly one conversion matrix.
//!
//! | target    | accepts                                                  |
//! |-----------|----------------------------------------------------------|
//! | int/int64 | integers, numbers (truncated toward zero), base-10 text  |
//! | float     | numbers, float text                                      |
//! | string    | text, numbers (shortest form), booleans                  |
//! | bool      | booleans, `1 t T TRUE true True 0 f F FALSE false False` |
//! | duration  | text with units only (`5m`, `1h30m`)                     |
//! | list      | lists of scalars, comma-joined text                      |
//! | map       | maps of scalars, comma-joined `key=value` text           |

pub mod composite;
pub mod duration;

use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::models::{SlotKind, SlotValue, Value};

pub use duration::DurationError;

/// Errors produced when a value cannot be converted to a slot's kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("cannot convert {found} to {expected}")]
    Mismatch {
        expected: SlotKind,
        found: &'static str,
    },

    #[error("invalid {expected} value {raw:?}: {reason}")]
    Parse {
        expected: SlotKind,
        raw: String,
        reason: String,
    },

    #[error("{value} is out of range for {expected}")]
    OutOfRange { expected: SlotKind, value: String },

    #[error("invalid map item {0:?}: expected key=value")]
    MapItem(String),

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("slot is borrowed by a handle")]
    Busy,
}

impl CoerceError {
    fn mismatch(expected: SlotKind, found: &Value) -> Self {
        Self::Mismatch {
            expected,
            found: found.type_name(),
        }
    }

    fn parse(expected: SlotKind, raw: &str, reason: impl Display) -> Self {
        Self::Parse {
            expected,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    fn out_of_range(expected: SlotKind, value: impl Display) -> Self {
        Self::OutOfRange {
            expected,
            value: value.to_string(),
        }
    }
}

/// Convert a decoded value into a slot value of the given kind.
pub fn coerce(kind: SlotKind, value: &Value) -> Result<SlotValue, CoerceError> {
    Ok(match kind {
        SlotKind::Int => SlotValue::Int(to_int(value)?),
        SlotKind::Int64 => SlotValue::Int64(to_int64(value)?),
        SlotKind::Float => SlotValue::Float(to_float(value)?),
        SlotKind::String => SlotValue::String(to_string(value)?),
        SlotKind::Bool => SlotValue::Bool(to_bool(value)?),
        SlotKind::Duration => SlotValue::Duration(to_duration(value)?),
        SlotKind::List => SlotValue::List(to_list(value)?),
        SlotKind::Map => SlotValue::Map(to_map(value)?),
    })
}

/// Convert a raw string (environment variable, flag, INI entry).
pub fn coerce_str(kind: SlotKind, raw: &str) -> Result<SlotValue, CoerceError> {
    coerce(kind, &Value::String(raw.to_string()))
}

pub fn to_int(value: &Value) -> Result<i32, CoerceError> {
    let wide = to_integer(value, SlotKind::Int)?;
    i32::try_from(wide).map_err(|_| CoerceError::out_of_range(SlotKind::Int, wide))
}

pub fn to_int64(value: &Value) -> Result<i64, CoerceError> {
    to_integer(value, SlotKind::Int64)
}

fn to_integer(value: &Value, expected: SlotKind) -> Result<i64, CoerceError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) => truncate(*f, expected),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|e| CoerceError::parse(expected, s, e)),
        other => Err(CoerceError::mismatch(expected, other)),
    }
}

/// Truncate toward zero, rejecting values an `i64` cannot hold.
fn truncate(f: f64, expected: SlotKind) -> Result<i64, CoerceError> {
    // 2^63 is exactly representable; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let t = f.trunc();
    if !t.is_finite() || t < -LIMIT || t >= LIMIT {
        return Err(CoerceError::out_of_range(expected, f));
    }
    Ok(t as i64)
}

pub fn to_float(value: &Value) -> Result<f64, CoerceError> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| CoerceError::parse(SlotKind::Float, s, e)),
        other => Err(CoerceError::mismatch(SlotKind::Float, other)),
    }
}

/// Scalars only. Numbers use their shortest round-trip decimal form.
pub fn to_string(value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CoerceError::mismatch(SlotKind::String, other)),
    }
}

pub fn to_bool(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse_bool(s)
            .ok_or_else(|| CoerceError::parse(SlotKind::Bool, s, "expected true or false")),
        other => Err(CoerceError::mismatch(SlotKind::Bool, other)),
    }
}

/// Boolean literals: `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Only unit-suffixed text; a bare number of seconds is rejected.
pub fn to_duration(value: &Value) -> Result<Duration, CoerceError> {
    match value {
        Value::String(s) => Ok(duration::parse(s)?),
        other => Err(CoerceError::mismatch(SlotKind::Duration, other)),
    }
}

pub fn to_list(value: &Value) -> Result<Vec<String>, CoerceError> {
    match value {
        Value::List(items) => items.iter().map(to_string).collect(),
        Value::String(s) => Ok(composite::split_list(s)),
        other => Err(CoerceError::mismatch(SlotKind::List, other)),
    }
}

pub fn to_map(value: &Value) -> Result<HashMap<String, String>, CoerceError> {
    match value {
        Value::Map(entries) => entries
            .iter()
            .map(|(k, v)| to_string(v).map(|s| (k.clone(), s)))
            .collect(),
        Value::String(s) => composite::parse_pairs(s),
        other => Err(CoerceError::mismatch(SlotKind::Map, other)),
    }
}
