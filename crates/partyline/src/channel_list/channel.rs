/*! Channel handle: a root-level row. Dropping it destroys the row. */

use super::{NodeRef, Registry, User};
use crate::callback::{Callback, PopupActions};
use crate::types::{NodeId, UiError, UiResult};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A channel row. Created by [`ChannelList::create_channel`](super::ChannelList::create_channel).
///
/// Destroying a channel (explicitly or by drop) removes its row and erases its
/// callbacks. [`User`](super::User)s created under it stay valid but become
/// detached: every further operation on them is a no-op.
#[derive(Debug)]
#[must_use = "dropping a Channel removes its row"]
pub struct Channel {
  node: NodeRef,
}

impl Channel {
  pub(super) const fn new(id: NodeId, list: Weak<RwLock<Registry>>) -> Self {
    Self {
      node: NodeRef { id, list },
    }
  }

  pub(super) fn belongs_to(&self, state: &Arc<RwLock<Registry>>) -> bool {
    std::ptr::eq(self.node.list.as_ptr(), Arc::as_ptr(state))
  }

  /// Stable identity of the row.
  pub const fn id(&self) -> NodeId {
    self.node.id
  }

  /// Whether the row still exists in a live list.
  pub fn is_live(&self) -> bool {
    self.node.is_live()
  }

  /// Current row text. `None` once the list is gone.
  pub fn label(&self) -> Option<String> {
    self.node.label()
  }

  /// Change the row text.
  pub fn set_text(&self, text: impl Into<String>) {
    let text = text.into();
    self.node.write(|r| r.set_label(self.node.id, text));
  }

  /// Replace the double-click callback. `None` clears it.
  pub fn set_activate(&self, callback: Option<Callback>) {
    self.node.write(|r| r.set_activate(self.node.id, callback));
  }

  /// Replace the popup capability set. `None` or an empty set clears it.
  pub fn set_secondary(&self, actions: Option<PopupActions>) {
    self.node.write(|r| r.set_secondary(self.node.id, actions));
  }

  /// Append a user row under this channel.
  ///
  /// Fails if the list no longer exists.
  pub fn add_user(&self, label: impl Into<String>) -> UiResult<User> {
    let label = label.into();
    let Some(created) = self.node.write(|r| r.create_user(self.node.id, label)) else {
      log::error!("add_user: channel {} outlived its list", self.node.id);
      return Err(UiError::ListDropped);
    };
    Ok(User::new(created?, self.node.list.clone()))
  }

  /// Users currently under this channel, in display order.
  pub fn users(&self) -> Vec<NodeId> {
    self
      .node
      .read(|r| r.children(self.node.id).to_vec())
      .unwrap_or_default()
  }

  /// Destroy now rather than at end of scope.
  pub fn destroy(self) {
    // Drop does the work
  }
}

impl Drop for Channel {
  fn drop(&mut self) {
    self.node.destroy();
  }
}
