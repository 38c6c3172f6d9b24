//! App-wide constants.
//!
//! Centralises the tool name, separators, and environment variable names
//! so a rename only requires changing this file.

/// Display name of the demo binary (lowercase).
pub const APP_NAME: &str = "slotconf";

/// Separator between items of a list or pairs of a map in textual form.
pub const ITEM_SEPARATOR: &str = ",";

/// Separator between a key and its value inside a map pair.
pub const PAIR_SEPARATOR: &str = "=";

/// Argument id used for trailing positional arguments.
///
/// Slot names may not start with `-`, so this can never collide.
pub const POSITIONAL_ID: &str = "-positional";

// ── Environment variable names ──────────────────────────────────────

/// Log filter for the demo binary (`tracing_subscriber::EnvFilter` syntax).
pub const ENV_LOG: &str = "SLOTCONF_LOG";

/// Config file the demo binary loads after parsing flags.
pub const ENV_CONFIG: &str = "SLOTCONF_CONFIG";
