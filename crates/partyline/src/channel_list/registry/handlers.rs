/*!
Event registry: node identity -> activate / secondary-action callbacks.

Keyed by `NodeId`, never by position, so sibling inserts and removals cannot
misroute a dispatch. At most one callback of each kind per node; setting a new
one replaces the old one.

Nothing stored here is dropped here: replaced and erased values are returned.
*/

use crate::callback::{Callback, PopupActions};
use crate::types::NodeId;
use std::collections::HashMap;
use std::mem;

/// Callbacks registered for one node.
#[derive(Debug, Default, Clone)]
pub(crate) struct Handlers {
  pub(crate) activate: Option<Callback>,
  pub(crate) secondary: Option<PopupActions>,
}

pub(crate) struct EventRegistry {
  entries: HashMap<NodeId, Handlers>,
}

impl EventRegistry {
  pub(crate) fn new() -> Self {
    Self {
      entries: HashMap::new(),
    }
  }

  /// Create the empty entry for a new node. Replaces anything left under the id.
  pub(crate) fn register(&mut self, id: NodeId) {
    self.entries.insert(id, Handlers::default());
  }

  pub(crate) fn is_registered(&self, id: NodeId) -> bool {
    self.entries.contains_key(&id)
  }

  /// Replace the activate callback. Returns the old one, or `callback` itself
  /// if the node has no entry.
  pub(crate) fn set_activate(
    &mut self,
    id: NodeId,
    callback: Option<Callback>,
  ) -> Option<Callback> {
    match self.entries.get_mut(&id) {
      Some(entry) => mem::replace(&mut entry.activate, callback),
      None => callback,
    }
  }

  /// Replace the capability set. An empty set counts as none.
  /// Returns the old set, or `actions` itself if the node has no entry.
  pub(crate) fn set_secondary(
    &mut self,
    id: NodeId,
    actions: Option<PopupActions>,
  ) -> Option<PopupActions> {
    match self.entries.get_mut(&id) {
      Some(entry) => mem::replace(&mut entry.secondary, actions.filter(|a| !a.is_empty())),
      None => actions,
    }
  }

  /// Clone of the activate callback, for calling after the lock is released.
  pub(crate) fn activate_for(&self, id: NodeId) -> Option<Callback> {
    self.entries.get(&id)?.activate.clone()
  }

  /// Clone of the capability set, for presenting after the lock is released.
  pub(crate) fn secondary_for(&self, id: NodeId) -> Option<PopupActions> {
    self.entries.get(&id)?.secondary.clone()
  }

  /// Remove both callbacks of a node, handing them back.
  pub(crate) fn erase(&mut self, id: NodeId) -> Option<Handlers> {
    self.entries.remove(&id)
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}
