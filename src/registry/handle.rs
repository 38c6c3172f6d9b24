//! Typed, live views onto registry slots.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

use crate::models::{Slot, SlotKind, SlotValue, Source};

/// A Rust type that can back a slot.
///
/// Implemented for `i32`, `i64`, `f64`, `String`, `bool`, `Duration`,
/// `Vec<String>` and `HashMap<String, String>`.
pub trait Setting: Clone + 'static {
    const KIND: SlotKind;

    fn into_value(self) -> SlotValue;

    fn from_value(value: &SlotValue) -> Option<&Self>;
}

macro_rules! impl_setting {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Setting for $ty {
                const KIND: SlotKind = SlotKind::$kind;

                fn into_value(self) -> SlotValue {
                    SlotValue::$kind(self)
                }

                fn from_value(value: &SlotValue) -> Option<&Self> {
                    match value {
                        SlotValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_setting! {
    i32 => Int,
    i64 => Int64,
    f64 => Float,
    String => String,
    bool => Bool,
    Duration => Duration,
    Vec<String> => List,
    HashMap<String, String> => Map,
}

/// A live handle to a registered slot.
///
/// Handles share the slot with the registry: an assignment made through
/// any source is visible through every handle for the same name. Reading a
/// handle does not consult the environment; [`Registry::get`] does.
///
/// [`Registry::get`]: crate::registry::Registry::get
pub struct Handle<T> {
    slot: Rc<RefCell<Slot>>,
    marker: PhantomData<T>,
}

impl<T: Setting> Handle<T> {
    /// Callers must have checked that the slot's kind is `T::KIND`.
    pub(crate) fn new(slot: Rc<RefCell<Slot>>) -> Self {
        debug_assert_eq!(slot.borrow().kind(), T::KIND);
        Self {
            slot,
            marker: PhantomData,
        }
    }

    pub fn name(&self) -> String {
        self.slot.borrow().name().to_string()
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value without copying it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let slot = self.slot.borrow();
        match T::from_value(slot.value()) {
            Some(value) => f(value),
            None => unreachable!("slot {} changed kind", slot.name()),
        }
    }

    /// Replace the value from code. Later flag, file, or environment
    /// assignments still apply on top.
    ///
    /// Panics if called from inside [`Handle::with`] on the same slot.
    pub fn set(&self, value: T) {
        self.slot
            .borrow_mut()
            .replace(value.into_value(), Source::Explicit);
    }

    /// Which source last assigned the value.
    pub fn source(&self) -> Source {
        self.slot.borrow().source()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            marker: PhantomData,
        }
    }
}

impl<T: Setting + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Handle")
            .field("name", &slot.name())
            .field("value", slot.value())
            .field("source", &slot.source())
            .finish()
    }
}
