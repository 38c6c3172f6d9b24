//! Registry error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::coerce::CoerceError;
use crate::loader::DecodeError;
use crate::models::Format;

/// Errors from registration, flag parsing, and file loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("slot {0:?} is already registered")]
    DuplicateSlot(String),

    #[error("invalid slot name {0:?}: names must be non-empty, not start with '-', and contain no '=' or whitespace")]
    InvalidName(String),

    #[error(transparent)]
    Flags(#[from] clap::Error),

    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidFlag {
        name: String,
        value: String,
        source: CoerceError,
    },

    #[error("flag -{0} was given while its slot is borrowed by a handle")]
    SlotBusy(String),

    #[error("argument {0:?} is not valid UTF-8")]
    NonUtf8Argument(String),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported config file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse {format} config: {source}")]
    Decode {
        format: Format,
        source: DecodeError,
    },

    /// Keys listed here were not applied; every other known key in the
    /// same document was.
    #[error("error setting {format} config {first}{}", more(.others))]
    Apply {
        format: Format,
        first: KeyError,
        others: Vec<KeyError>,
    },
}

impl ConfigError {
    /// All keys that failed to apply, in document order.
    pub fn failed_keys(&self) -> Vec<&str> {
        match self {
            ConfigError::Apply { first, others, .. } => std::iter::once(first)
                .chain(others)
                .map(|e| e.key.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A single key of a document that could not be coerced into its slot.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("key {key}: {source}")]
pub struct KeyError {
    pub key: String,
    pub source: CoerceError,
}

fn more(others: &[KeyError]) -> More<'_> {
    More(others)
}

struct More<'a>(&'a [KeyError]);

impl fmt::Display for More<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => Ok(()),
            1 => write!(f, " (and key {} also failed)", self.0[0].key),
            n => write!(f, " (and {n} more keys failed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotKind;

    fn key_error(key: &str) -> KeyError {
        KeyError {
            key: key.to_string(),
            source: CoerceError::Mismatch {
                expected: SlotKind::Int,
                found: "boolean",
            },
        }
    }

    #[test]
    fn apply_error_names_first_key() {
        let err = ConfigError::Apply {
            format: Format::Json,
            first: key_error("port"),
            others: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "error setting json config key port: cannot convert boolean to int"
        );
        assert_eq!(err.failed_keys(), vec!["port"]);
    }

    #[test]
    fn apply_error_counts_others() {
        let err = ConfigError::Apply {
            format: Format::Yaml,
            first: key_error("a"),
            others: vec![key_error("b"), key_error("c")],
        };
        assert!(err.to_string().ends_with("(and 2 more keys failed)"));
        assert_eq!(err.failed_keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn read_error_mentions_path() {
        let err = ConfigError::ReadFile {
            path: PathBuf::from("/nope/config.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nope/config.json"));
    }
}
