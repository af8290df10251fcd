/*! Host preference store, as consumed by the toggle button. */

use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Hierarchical preference store owned by the host (paths like `/a/b/c`).
pub trait Preferences: Send + Sync {
  /// Whether a node exists at `path`, with or without a value.
  fn exists(&self, path: &str) -> bool;

  /// Create a value-less node, used to group children.
  fn add_none(&self, path: &str);

  /// Stored boolean, false if missing or not a boolean.
  fn get_bool(&self, path: &str) -> bool;

  /// Store a boolean, creating the entry if needed.
  fn set_bool(&self, path: &str, value: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefValue {
  None,
  Bool(bool),
}

/// In-memory [`Preferences`] for hosts without a store of their own, and for tests.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
  entries: Mutex<BTreeMap<String, PrefValue>>,
}

impl MemoryPreferences {
  /// An empty store.
  pub fn new() -> Self {
    Self::default()
  }

  /// All stored paths, sorted.
  pub fn paths(&self) -> Vec<String> {
    self.entries.lock().keys().cloned().collect()
  }
}

impl Preferences for MemoryPreferences {
  fn exists(&self, path: &str) -> bool {
    self.entries.lock().contains_key(path)
  }

  fn add_none(&self, path: &str) {
    self
      .entries
      .lock()
      .entry(path.to_owned())
      .or_insert(PrefValue::None);
  }

  fn get_bool(&self, path: &str) -> bool {
    matches!(self.entries.lock().get(path), Some(PrefValue::Bool(true)))
  }

  fn set_bool(&self, path: &str, value: bool) {
    self
      .entries
      .lock()
      .insert(path.to_owned(), PrefValue::Bool(value));
  }
}
