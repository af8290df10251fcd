/*!
Node operations for the Registry.

Create: `create_channel`, `create_user`
Update: `set_label`
Destroy: `destroy`, which runs the lifecycle guard:

1. detach every child (clear its parent link and its callbacks, keep its entry
   so the owning handle stays valid),
2. erase the node's own callbacks,
3. remove the node from the tree.

A detached node is forgotten quietly when its own handle is destroyed.

The callbacks erased along the way are returned, not dropped: they may own
handles into this same list.
*/

use super::handlers::Handlers;
use super::{NodeEntry, NodeState, Registry};
use crate::types::{Event, NodeId, NodeKind, UiError, UiResult};

impl Registry {
  /// Append a channel row at root level with empty callbacks.
  pub(crate) fn create_channel(&mut self, label: String) -> UiResult<NodeId> {
    let id = self.tree.insert_root(None).ok_or(UiError::IdsExhausted)?;
    self.attach(id, NodeKind::Channel, label);
    Ok(id)
  }

  /// Append a user row under a live channel with empty callbacks.
  pub(crate) fn create_user(&mut self, channel: NodeId, label: String) -> UiResult<NodeId> {
    let is_live_channel = self
      .nodes
      .get(&channel)
      .is_some_and(|n| n.kind == NodeKind::Channel && n.state == NodeState::Attached);
    if !is_live_channel {
      log::error!("create_user: channel {channel} is not live. This is a bug in the caller.");
      return Err(UiError::ChannelNotLive(channel));
    }

    // The channel is attached, so it is in the tree: only ids can run out
    let id = self
      .tree
      .insert_child(channel, None)
      .ok_or(UiError::IdsExhausted)?;
    self.attach(id, NodeKind::User, label);

    if self.auto_expand {
      if let Some(path) = self.tree.position_of(id) {
        self.emit(Event::RowExpanded { path });
      }
    }
    Ok(id)
  }

  fn attach(&mut self, id: NodeId, kind: NodeKind, label: String) {
    self.nodes.insert(
      id,
      NodeEntry {
        kind,
        label: label.clone(),
        state: NodeState::Attached,
      },
    );
    self.handlers.register(id);

    if let Some(path) = self.tree.position_of(id) {
      self.emit(Event::RowInserted {
        node_id: id,
        path,
        label,
      });
    }
  }

  /// Change a row's text. Returns false (and does nothing) if the node is not live.
  pub(crate) fn set_label(&mut self, id: NodeId, label: String) -> bool {
    let Some(path) = self.tree.position_of(id) else {
      log::debug!("set_label: node {id} is not in the tree, ignoring");
      return false;
    };
    let Some(entry) = self.nodes.get_mut(&id) else {
      return false;
    };
    if entry.state != NodeState::Attached {
      return false;
    }

    entry.label.clone_from(&label);
    self.emit(Event::RowChanged {
      node_id: id,
      path,
      label,
    });
    true
  }

  /// Destroy a node. Unknown ids are a no-op.
  ///
  /// Returns the callbacks of the node and of its detached children.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn destroy(&mut self, id: NodeId) -> Vec<Handlers> {
    let Some(state) = self.nodes.get(&id).map(|n| n.state) else {
      log::debug!("destroy: node {id} already gone");
      return Vec::new();
    };

    if state == NodeState::Detached {
      self.nodes.remove(&id);
      return Vec::new();
    }

    // 1. Children keep their entries but lose their link to us
    let children = self.tree.children(id).to_vec();
    let mut released: Vec<Handlers> = children
      .into_iter()
      .filter_map(|child| self.detach(child))
      .collect();

    // 2. Our own callbacks
    released.extend(self.handlers.erase(id));

    // 3. Structure. The path must be taken before removal.
    let path = self.tree.position_of(id);
    self.tree.remove_subtree(id);
    self.nodes.remove(&id);

    if let Some(path) = path {
      self.emit(Event::RowRemoved { node_id: id, path });
    }
    released
  }

  fn detach(&mut self, id: NodeId) -> Option<Handlers> {
    let entry = self.nodes.get_mut(&id)?;
    entry.state = NodeState::Detached;
    let released = self.handlers.erase(id);
    self.emit(Event::NodeDetached { node_id: id });
    released
  }
}
