//! The slot registry: registration, precedence-resolving reads, and the
//! entry points for flag parsing and file loading.
//!
//! Precedence (highest first):
//! 1. An environment variable named exactly like the slot, re-checked on
//!    every [`Registry::get`]. Ignored when it doesn't parse.
//! 2. The latest flag or file assignment (they share one cell; the last
//!    one applied wins, and [`Registry::parse`] applies flags first).
//! 3. The registered default.

pub mod handle;

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::cli;
use crate::env::Env;
use crate::error::ConfigError;
use crate::loader;
use crate::models::{Document, Format, Slot, SlotKind, SlotValue, SlotView, Source};
use crate::output::Renderer;
use crate::output::usage::UsageRenderer;

pub use handle::{Handle, Setting};

/// Owns every slot of one configuration domain.
///
/// Slots are shared with their handles through `Rc<RefCell<_>>`, so a
/// registry is confined to the thread that built it. Copy values out of
/// handles to hand them to other threads.
pub struct Registry {
    program: String,
    slots: IndexMap<String, Rc<RefCell<Slot>>>,
    env: Env,
}

impl Registry {
    /// Create a registry that reads overrides from the process environment.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_env(program, Env::real())
    }

    /// Create a registry with an explicit environment.
    pub fn with_env(program: impl Into<String>, env: Env) -> Self {
        Self {
            program: program.into(),
            slots: IndexMap::new(),
            env,
        }
    }

    /// Program name shown in the usage header.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Declare a slot with its default and usage line, bound to the flag
    /// `-<name>`.
    pub fn register<T: Setting>(
        &mut self,
        name: impl Into<String>,
        default: T,
        usage: impl Into<String>,
    ) -> Result<Handle<T>, ConfigError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(ConfigError::InvalidName(name));
        }
        if self.slots.contains_key(&name) {
            return Err(ConfigError::DuplicateSlot(name));
        }

        let slot = Rc::new(RefCell::new(Slot::new(
            name.clone(),
            default.into_value(),
            usage,
        )));
        tracing::debug!(slot = %name, kind = %T::KIND, "registered slot");
        self.slots.insert(name, Rc::clone(&slot));
        Ok(Handle::new(slot))
    }

    /// Resolve a slot and return a typed handle to it.
    ///
    /// An environment variable named exactly `name` that parses for the
    /// slot's kind replaces the current value first. Returns `None` when
    /// no slot of that name and kind exists.
    pub fn get<T: Setting>(&self, name: &str) -> Option<Handle<T>> {
        let cell = self.resolve(name)?;
        let matches = cell.borrow().kind() == T::KIND;
        matches.then(|| Handle::new(Rc::clone(cell)))
    }

    /// Resolve a slot and return a copy of its value, whatever its kind.
    pub fn value(&self, name: &str) -> Option<SlotValue> {
        self.resolve(name)
            .map(|cell| cell.borrow().value().clone())
    }

    /// Kind of a registered slot. Does not consult the environment.
    pub fn kind(&self, name: &str) -> Option<SlotKind> {
        self.slots.get(name).map(|cell| cell.borrow().kind())
    }

    /// Whether a slot named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is registered yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Resolved views of every slot, in registration order.
    pub fn snapshot(&self) -> Vec<SlotView> {
        self.slots
            .keys()
            .filter_map(|name| self.resolve(name))
            .map(|cell| SlotView::from(&*cell.borrow()))
            .collect()
    }

    /// Parse command-line arguments (including the program name in
    /// position 0) into the registered slots.
    ///
    /// Returns the arguments left after the first non-flag argument or `--`.
    pub fn parse_args<I, S>(&mut self, args: I) -> Result<Vec<String>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        cli::parse(self, args)
    }

    /// Parse flags, then load `file` if one is given.
    ///
    /// A file value therefore overrides a flag value for the same slot.
    pub fn parse<I, S>(&mut self, args: I, file: Option<&Path>) -> Result<Vec<String>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rest = self.parse_args(args)?;
        if let Some(path) = file {
            self.load_file(path)?;
        }
        Ok(rest)
    }

    /// Load a config file, choosing the format by extension.
    ///
    /// Read, format, and decode errors leave every slot untouched. A key
    /// that fails coercion is reported through [`ConfigError::Apply`] but
    /// does not stop the remaining keys, and keys already applied stay
    /// applied.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        loader::load_file(self, path.as_ref())
    }

    /// Decode and apply an in-memory document.
    pub fn load_bytes(&mut self, format: Format, bytes: &[u8]) -> Result<(), ConfigError> {
        loader::load_bytes(self, format, bytes)
    }

    /// Apply an already-decoded document.
    pub fn apply_document(&mut self, format: Format, document: &Document) -> Result<(), ConfigError> {
        loader::apply(self, format, document)
    }

    /// Multi-line listing of every slot: flag, kind, default, source, usage.
    pub fn usage(&self) -> String {
        let renderer = UsageRenderer {
            program: self.program.clone(),
        };
        renderer.render(&self.views())
    }

    /// Views without the environment check, for display.
    pub(crate) fn views(&self) -> Vec<SlotView> {
        self.slots
            .values()
            .map(|cell| SlotView::from(&*cell.borrow()))
            .collect()
    }

    /// The raw cell, without the environment check.
    pub(crate) fn cell(&self, name: &str) -> Option<&Rc<RefCell<Slot>>> {
        self.slots.get(name)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Rc<RefCell<Slot>>)> {
        self.slots.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    fn resolve(&self, name: &str) -> Option<&Rc<RefCell<Slot>>> {
        let cell = self.slots.get(name)?;
        self.apply_env(name, cell);
        Some(cell)
    }

    fn apply_env(&self, name: &str, cell: &Rc<RefCell<Slot>>) {
        let Some(raw) = self.env.lookup(name) else {
            return;
        };
        // A handle's `with` closure may be holding a borrow; the override
        // is picked up on the next read instead.
        let Ok(mut slot) = cell.try_borrow_mut() else {
            return;
        };
        match slot.override_str(&raw, Source::Env) {
            Ok(()) => tracing::debug!(slot = %name, "applied environment override"),
            Err(err) => {
                tracing::debug!(slot = %name, error = %err, "ignoring unparsable environment override");
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("program", &self.program)
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Names must be spellable as `-name=value`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.contains('=')
        && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn registry(env: &[(&str, &str)]) -> Registry {
        Registry::with_env("test", Env::mock(env.iter().copied()))
    }

    #[test]
    fn register_then_get_returns_default() {
        let mut reg = registry(&[]);
        reg.register("port", 8080i32, "listen port").unwrap();
        reg.register("name", "svc".to_string(), "service name").unwrap();
        reg.register("timeout", Duration::from_secs(5), "timeout").unwrap();

        assert_eq!(reg.get::<i32>("port").unwrap().get(), 8080);
        assert_eq!(reg.get::<String>("name").unwrap().get(), "svc");
        assert_eq!(
            reg.get::<Duration>("timeout").unwrap().get(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn get_with_wrong_kind_is_none() {
        let mut reg = registry(&[]);
        reg.register("port", 8080i32, "").unwrap();
        assert!(reg.get::<i64>("port").is_none());
        assert!(reg.get::<String>("port").is_none());
        assert!(reg.get::<i32>("missing").is_none());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = registry(&[]);
        reg.register("port", 1i32, "").unwrap();
        let err = reg.register("port", 2i64, "").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSlot(ref n) if n == "port"));
        assert_eq!(reg.kind("port"), Some(SlotKind::Int));
    }

    #[test]
    fn invalid_names_fail() {
        let mut reg = registry(&[]);
        for name in ["", "-port", "a=b", "two words"] {
            assert!(
                matches!(reg.register(name, 1i32, ""), Err(ConfigError::InvalidName(_))),
                "{name:?}"
            );
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn env_overrides_on_read() {
        let mut reg = registry(&[("port", "9191"), ("debug", "true")]);
        let port = reg.register("port", 8080i32, "").unwrap();
        reg.register("debug", false, "").unwrap();

        // Handles don't consult the environment on their own.
        assert_eq!(port.get(), 8080);
        assert_eq!(reg.get::<i32>("port").unwrap().get(), 9191);
        assert_eq!(port.get(), 9191);
        assert_eq!(port.source(), Source::Env);
        assert!(reg.get::<bool>("debug").unwrap().get());
    }

    #[test]
    fn env_is_applied_even_when_requested_kind_differs() {
        let mut reg = registry(&[("port", "9191")]);
        let port = reg.register("port", 8080i32, "").unwrap();

        assert!(reg.get::<String>("port").is_none());
        assert_eq!(port.get(), 9191);
        assert_eq!(port.source(), Source::Env);
    }

    #[test]
    fn unparsable_env_is_ignored() {
        let mut reg = registry(&[("port", "not-a-number")]);
        reg.register("port", 8080i32, "").unwrap();
        let port = reg.get::<i32>("port").unwrap();
        assert_eq!(port.get(), 8080);
        assert_eq!(port.source(), Source::Default);
    }

    #[test]
    fn env_list_override_replaces_and_is_stable_across_reads() {
        let mut reg = registry(&[("tags", "x,y")]);
        reg.register("tags", vec!["default".to_string()], "").unwrap();
        for _ in 0..3 {
            assert_eq!(reg.get::<Vec<String>>("tags").unwrap().get(), vec!["x", "y"]);
        }
    }

    #[test]
    fn env_map_override() {
        let mut reg = registry(&[("labels", "k1=v1,k2=v2")]);
        reg.register("labels", HashMap::<String, String>::new(), "").unwrap();
        let labels = reg.get::<HashMap<String, String>>("labels").unwrap().get();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["k1"], "v1");
    }

    #[test]
    fn env_lookup_is_exact_name() {
        let mut reg = registry(&[("PORT", "1"), ("APP_port", "2")]);
        reg.register("port", 8080i32, "").unwrap();
        assert_eq!(reg.get::<i32>("port").unwrap().get(), 8080);
    }

    #[test]
    fn value_is_untyped_and_resolved() {
        let mut reg = registry(&[("ratio", "0.75")]);
        reg.register("ratio", 0.5f64, "").unwrap();
        assert_eq!(reg.value("ratio"), Some(SlotValue::Float(0.75)));
        assert_eq!(reg.value("missing"), None);
    }

    #[test]
    fn names_in_registration_order() {
        let mut reg = registry(&[]);
        reg.register("zeta", 1i32, "").unwrap();
        reg.register("alpha", 1i32, "").unwrap();
        reg.register("mid", 1i32, "").unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(reg.len(), 3);
        assert!(reg.contains("alpha"));
    }

    #[test]
    fn snapshot_resolves_environment() {
        let mut reg = registry(&[("host", "example.org")]);
        reg.register("host", "localhost".to_string(), "bind host").unwrap();
        let views = reg.snapshot();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].value, SlotValue::String("example.org".into()));
        assert_eq!(views[0].default, SlotValue::String("localhost".into()));
        assert_eq!(views[0].source, Source::Env);
    }

    #[test]
    fn env_override_during_borrow_is_deferred() {
        let mut reg = registry(&[("port", "9191")]);
        let port = reg.register("port", 8080i32, "").unwrap();
        let seen = port.with(|_| reg.get::<i32>("port").is_some());
        assert!(seen);
        assert_eq!(reg.get::<i32>("port").unwrap().get(), 9191);
    }
}
