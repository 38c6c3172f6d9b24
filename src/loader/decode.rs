//! Format decoders producing a flat [`Document`] of top-level keys.
//!
//! Uses `serde_json`, `serde_yaml_ng`, `rust-ini` and `toml`. INI is read
//! from the default (section-less) part of the file only, and keys with
//! empty values are skipped.

use ini::Ini;
use thiserror::Error;

use crate::models::{Document, Format, Value};

/// Errors while turning file bytes into a document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    Ini(#[from] ini::ParseError),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),

    #[error("unsupported mapping key {0}")]
    Key(String),
}

/// Decode `bytes` as `format`.
///
/// An empty document (or a top-level `null`) yields no keys.
pub fn decode(format: Format, bytes: &[u8]) -> Result<Document, DecodeError> {
    match format {
        Format::Json => {
            let value: serde_json::Value = serde_json::from_slice(bytes)?;
            top_level(Value::from(value))
        }
        Format::Yaml => {
            let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(std::str::from_utf8(bytes)?)?;
            top_level(from_yaml(value)?)
        }
        Format::Ini => decode_ini(std::str::from_utf8(bytes)?),
        Format::Toml => {
            let table: toml::Table = toml::from_str(std::str::from_utf8(bytes)?)?;
            Ok(table
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect())
        }
    }
}

fn top_level(value: Value) -> Result<Document, DecodeError> {
    match value {
        Value::Map(document) => Ok(document),
        Value::Null => Ok(Document::new()),
        other => Err(DecodeError::NotAMapping(other.type_name())),
    }
}

fn decode_ini(text: &str) -> Result<Document, DecodeError> {
    let ini = Ini::load_from_str(text)?;
    let Some(section) = ini.section(None::<String>) else {
        return Ok(Document::new());
    };
    Ok(section
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect())
}

fn from_yaml(value: serde_yaml_ng::Value) -> Result<Value, DecodeError> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => Value::Map(
            mapping
                .into_iter()
                .map(|(key, value)| -> Result<(String, Value), DecodeError> {
                    Ok((yaml_key(key)?, from_yaml(value)?))
                })
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

/// Scalar keys are stringified; anything else can't name a slot.
fn yaml_key(key: serde_yaml_ng::Value) -> Result<String, DecodeError> {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        other => Err(DecodeError::Key(format!("{other:?}"))),
    }
}
