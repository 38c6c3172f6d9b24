//! Config file loading: pick a format, decode, then apply key by key.
//!
//! Only top-level keys that name a registered slot are applied; the rest
//! are ignored. Nothing is applied unless the whole file decodes.

pub mod decode;

use std::path::Path;

use crate::coerce::CoerceError;
use crate::error::{ConfigError, KeyError};
use crate::models::{Document, Format, Source};
use crate::registry::Registry;

pub use decode::{DecodeError, decode};

/// Load `path`, choosing the decoder from its extension.
pub(crate) fn load_file(registry: &Registry, path: &Path) -> Result<(), ConfigError> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), %format, "loading config file");
    load_bytes(registry, format, &bytes)
}

pub(crate) fn load_bytes(registry: &Registry, format: Format, bytes: &[u8]) -> Result<(), ConfigError> {
    let document = decode(format, bytes).map_err(|source| ConfigError::Decode { format, source })?;
    apply(registry, format, &document)
}

/// Apply every known key, collecting the ones that fail coercion.
pub(crate) fn apply(registry: &Registry, format: Format, document: &Document) -> Result<(), ConfigError> {
    let source = Source::File(format);
    let mut failures = Vec::new();

    for (key, value) in document {
        let Some(cell) = registry.cell(key) else {
            tracing::debug!(%key, %format, "ignoring key with no matching slot");
            continue;
        };
        // A live `Handle::with` borrow makes the slot unwritable for now.
        let applied = match cell.try_borrow_mut() {
            Ok(mut slot) => slot.apply(value, source),
            Err(_) => Err(CoerceError::Busy),
        };
        match applied {
            Ok(()) => tracing::debug!(%key, %format, "applied config key"),
            Err(err) => failures.push(KeyError {
                key: key.clone(),
                source: err,
            }),
        }
    }

    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(()),
        Some(first) => {
            let others: Vec<KeyError> = failures.collect();
            tracing::warn!(%format, failed = others.len() + 1, "some config keys could not be applied");
            Err(ConfigError::Apply {
                format,
                first,
                others,
            })
        }
    }
}
