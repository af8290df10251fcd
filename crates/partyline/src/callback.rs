/*!
Callback values stored by the registries.

A `Callback` is built independently of any node and handed to a registry,
which then owns it. Clones share the same closure. Registries clone the
callback out and release their lock before calling it, so a callback may
freely mutate the registry that fired it.
*/

use std::fmt;
use std::sync::Arc;

/// A zero-argument action.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
  /// Wrap a closure.
  pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
    Self(Arc::new(f))
  }

  /// Run the closure.
  pub fn call(&self) {
    (self.0)();
  }

  /// Whether both values wrap the same closure.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl fmt::Debug for Callback {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Callback").finish_non_exhaustive()
  }
}

impl<F: Fn() + Send + Sync + 'static> From<F> for Callback {
  fn from(f: F) -> Self {
    Self::new(f)
  }
}

/// One entry of a popup menu.
#[derive(Debug, Clone)]
pub struct PopupItem {
  /// Menu text, unique within its set.
  pub label: String,
  /// Run when the item is picked.
  pub action: Callback,
}

/// Ordered capability set offered on secondary click: menu label -> action.
///
/// Labels are unique; pushing an existing label replaces its action in place.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PopupActions {
  items: Vec<PopupItem>,
}

impl PopupActions {
  /// An empty set. Registering it counts as no popup at all.
  pub const fn new() -> Self {
    Self { items: Vec::new() }
  }

  /// Builder-style [`push`](Self::push).
  pub fn with(mut self, label: impl Into<String>, action: impl Into<Callback>) -> Self {
    self.push(label, action);
    self
  }

  /// Append an item. An item with the same label is replaced in place.
  pub fn push(&mut self, label: impl Into<String>, action: impl Into<Callback>) {
    let label = label.into();
    let action = action.into();
    match self.items.iter_mut().find(|item| item.label == label) {
      Some(item) => item.action = action,
      None => self.items.push(PopupItem { label, action }),
    }
  }

  /// Remove the item with `label`, returning its action.
  pub fn remove(&mut self, label: &str) -> Option<Callback> {
    let pos = self.items.iter().position(|item| item.label == label)?;
    Some(self.items.remove(pos).action)
  }

  /// Number of items.
  pub fn len(&self) -> usize {
    self.items.len()
  }

  /// Whether there are no items.
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Items in menu order.
  pub fn iter(&self) -> impl Iterator<Item = &PopupItem> {
    self.items.iter()
  }

  /// Item labels in menu order.
  pub fn labels(&self) -> impl Iterator<Item = &str> {
    self.items.iter().map(|item| item.label.as_str())
  }

  /// Run the action behind `label`, as the popup does when an item is chosen.
  /// Returns false if there is no such item.
  pub fn activate(&self, label: &str) -> bool {
    match self.items.iter().find(|item| item.label == label) {
      Some(item) => {
        item.action.call();
        true
      }
      None => false,
    }
  }
}

impl<'a> IntoIterator for &'a PopupActions {
  type Item = &'a PopupItem;
  type IntoIter = std::slice::Iter<'a, PopupItem>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}
