//! slotconf: typed configuration slots fed by flags, environment
//! variables, and JSON/YAML/INI/TOML files (library crate).
//!
//! Declare each setting once with a default and a usage line, then resolve
//! it from whichever sources are present:
//!
//! ```
//! use slotconf::{Env, Registry};
//!
//! let env = Env::mock([("port", "9191")]);
//! let mut registry = Registry::with_env("svc", env);
//! registry.register("port", 8080i32, "port to listen on").unwrap();
//! registry.register("tags", Vec::<String>::new(), "metric tags").unwrap();
//!
//! registry.parse_args(["svc", "-tags=a,b", "-tags", "c"]).unwrap();
//! registry
//!     .load_bytes(slotconf::Format::Json, br#"{"port": 9090}"#)
//!     .unwrap();
//!
//! // The environment wins over the file.
//! assert_eq!(registry.get::<i32>("port").unwrap().get(), 9191);
//! assert_eq!(registry.get::<Vec<String>>("tags").unwrap().get(), ["a", "b", "c"]);
//! ```

pub mod cli;
pub mod coerce;
pub mod constants;
pub mod env;
pub mod error;
pub mod loader;
pub mod models;
pub mod output;
pub mod registry;

pub use env::Env;
pub use error::{ConfigError, KeyError};
pub use models::{Document, Format, SlotKind, SlotValue, SlotView, Source, Value};
pub use registry::{Handle, Registry, Setting};
