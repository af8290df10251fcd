/*!
Registry - the single source of truth for the channel list.

All fields are private to the registry module. Mutations go through methods
that maintain invariants and emit events. This guarantees:
- Tree order, node metadata and callbacks never disagree about which nodes exist
- Every structural change is published
- Destruction always follows the detach -> erase -> remove order
- Callbacks leaving the registry are handed back to the caller, never dropped
  here. They may own handles whose `Drop` takes the lock again, so the caller
  drops them once the guard is gone.

## Module Structure

- `mod.rs` - Registry struct, node entries, queries, callback access
- `nodes.rs` - node creation, relabelling, destruction (the lifecycle guard)
- `handlers.rs` - `EventRegistry` for activate/secondary callbacks
- `tree.rs` - `StructuralTree` for order and on-demand paths
*/

mod handlers;
mod nodes;
mod tree;

use async_broadcast::Sender;
use std::collections::HashMap;

use crate::callback::{Callback, PopupActions};
use crate::events;
use crate::types::{Event, NodeId, NodeKind, TreePath};
use handlers::EventRegistry;
use tree::StructuralTree;

/// Whether a node still belongs to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
  /// In the tree, routable.
  Attached,
  /// Lost its channel. The handle is still alive but every operation is a no-op.
  Detached,
}

/// Per-node state in the registry.
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
  pub(crate) kind: NodeKind,
  pub(crate) label: String,
  pub(crate) state: NodeState,
}

/// Internal state storage with automatic event emission.
pub(crate) struct Registry {
  events_tx: Sender<Event>,
  auto_expand: bool,

  nodes: HashMap<NodeId, NodeEntry>,
  tree: StructuralTree,
  handlers: EventRegistry,
}

impl Registry {
  pub(crate) fn new(events_tx: Sender<Event>, auto_expand: bool) -> Self {
    Self {
      events_tx,
      auto_expand,
      nodes: HashMap::new(),
      tree: StructuralTree::new(),
      handlers: EventRegistry::new(),
    }
  }

  fn emit(&self, event: Event) {
    events::emit(&self.events_tx, event);
  }

  /// Get node entry by ID. Includes detached nodes.
  pub(crate) fn node(&self, id: NodeId) -> Option<&NodeEntry> {
    self.nodes.get(&id)
  }

  /// Whether the node is attached and routable.
  pub(crate) fn is_live(&self, id: NodeId) -> bool {
    self
      .nodes
      .get(&id)
      .is_some_and(|n| n.state == NodeState::Attached)
      && self.handlers.is_registered(id)
  }

  /// Channel a user sits under. `None` for channels and detached users.
  pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.tree.parent(id)
  }

  pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
    self.tree.children(id)
  }

  pub(crate) fn channels(&self) -> &[NodeId] {
    self.tree.roots()
  }

  /// Current on-screen position. Computed on demand, never cached.
  pub(crate) fn position_of(&self, id: NodeId) -> Option<TreePath> {
    self.tree.position_of(id)
  }

  /// Node currently shown at `path`.
  pub(crate) fn node_at(&self, path: &TreePath) -> Option<NodeId> {
    self.tree.node_at(path)
  }

  /// Replace a node's activate callback. No-op on stale or detached nodes.
  ///
  /// Returns the displaced callback, or `callback` itself if it was refused.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn set_activate(
    &mut self,
    id: NodeId,
    callback: Option<Callback>,
  ) -> Option<Callback> {
    if !self.is_live(id) {
      log::debug!("set_activate: node {id} is not live, ignoring");
      return callback;
    }
    self.handlers.set_activate(id, callback)
  }

  /// Replace a node's capability set. No-op on stale or detached nodes.
  ///
  /// Returns the displaced set, or `actions` itself if it was refused.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn set_secondary(
    &mut self,
    id: NodeId,
    actions: Option<PopupActions>,
  ) -> Option<PopupActions> {
    if !self.is_live(id) {
      log::debug!("set_secondary: node {id} is not live, ignoring");
      return actions;
    }
    self.handlers.set_secondary(id, actions)
  }

  pub(crate) fn activate_for(&self, id: NodeId) -> Option<Callback> {
    self.handlers.activate_for(id)
  }

  pub(crate) fn secondary_for(&self, id: NodeId) -> Option<PopupActions> {
    self.handlers.secondary_for(id)
  }

  /// Number of nodes with a callback entry. Detached and destroyed nodes have none.
  pub(crate) fn registered_count(&self) -> usize {
    self.handlers.len()
  }
}
