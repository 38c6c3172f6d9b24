//! Shared types used across all modules.
//!
//! Slot kinds, value provenance, and file formats live here; the loose
//! decoded value and the strict slot value have their own submodules.
//! Other modules import from here rather than reaching into each other's
//! internals.

pub mod slot;
pub mod value;

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};
use strum::{Display, EnumString};

pub use slot::{Slot, SlotValue, SlotView};
pub use value::{Document, Value};

/// Semantic type of a slot. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Int,
    Int64,
    Float,
    String,
    Bool,
    Duration,
    List,
    Map,
}

impl SlotKind {
    /// Placeholder shown for the flag's value in clap errors.
    pub fn value_name(self) -> &'static str {
        match self {
            SlotKind::Int | SlotKind::Int64 => "INT",
            SlotKind::Float => "FLOAT",
            SlotKind::String => "STRING",
            SlotKind::Bool => "BOOL",
            SlotKind::Duration => "DURATION",
            SlotKind::List => "ITEM[,ITEM...]",
            SlotKind::Map => "KEY=VALUE[,...]",
        }
    }
}

/// Structured file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Format {
    Json,
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
    Ini,
    Toml,
}

impl Format {
    /// Select a format by file extension (`.json`, `.yaml`/`.yml`, `.ini`, `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

/// Where a slot's current value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Source {
    /// The value given at registration.
    #[default]
    Default,
    /// A command-line flag.
    Flag,
    /// An environment variable named like the slot.
    Env,
    /// A config file of the given format.
    File(Format),
    /// Assigned in code through a handle.
    Explicit,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::Flag => write!(f, "flag"),
            Source::Env => write!(f, "env"),
            Source::File(format) => write!(f, "{format}"),
            Source::Explicit => write!(f, "explicit"),
        }
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
