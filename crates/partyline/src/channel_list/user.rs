/*! User handle: a row under a channel. Dropping it destroys the row. */

use super::{NodeRef, Registry};
use crate::callback::{Callback, PopupActions};
use crate::types::NodeId;
use parking_lot::RwLock;
use std::sync::Weak;

/// A user row. Created by [`ChannelList::create_user`](super::ChannelList::create_user).
///
/// If its channel is destroyed first the user is detached: the row is gone,
/// its callbacks are erased, and [`set_text`](Self::set_text) and friends do
/// nothing. The handle itself stays valid until dropped.
#[derive(Debug)]
#[must_use = "dropping a User removes its row"]
pub struct User {
  node: NodeRef,
}

impl User {
  pub(super) const fn new(id: NodeId, list: Weak<RwLock<Registry>>) -> Self {
    Self {
      node: NodeRef { id, list },
    }
  }

  /// Stable identity of the row.
  pub const fn id(&self) -> NodeId {
    self.node.id
  }

  /// The channel this user sits under. `None` once detached.
  pub fn channel(&self) -> Option<NodeId> {
    self.node.read(|r| r.parent(self.node.id)).flatten()
  }

  /// Whether the user lost its channel (or its whole list).
  pub fn is_detached(&self) -> bool {
    !self.node.is_live()
  }

  /// Row text. Keeps the last value once detached, `None` once the list is gone.
  pub fn label(&self) -> Option<String> {
    self.node.label()
  }

  /// Change the row text. No-op once detached.
  pub fn set_text(&self, text: impl Into<String>) {
    let text = text.into();
    self.node.write(|r| r.set_label(self.node.id, text));
  }

  /// Replace the double-click callback. `None` clears it. No-op once detached.
  pub fn set_activate(&self, callback: Option<Callback>) {
    self.node.write(|r| r.set_activate(self.node.id, callback));
  }

  /// Replace the popup capability set. No-op once detached.
  pub fn set_secondary(&self, actions: Option<PopupActions>) {
    self.node.write(|r| r.set_secondary(self.node.id, actions));
  }

  /// Destroy now rather than at end of scope.
  pub fn destroy(self) {
    // Drop does the work
  }
}

impl Drop for User {
  fn drop(&mut self) {
    self.node.destroy();
  }
}
