/*!
Structural tree: the ordered forest of rows, and the path projection over it.

Single source of truth for parent/child order. `NodeId`s are issued here, once,
and never reassigned or reused. When the counter runs out, insertion is
refused. Positions are never stored: [`position_of`]
walks the live structure on every call.

## Invariants

1. **Single parent**: a non-root node has exactly one parent while it is in
   the tree. Roots have none and appear in `roots` instead.
2. **Bidirectional consistency**: if `parent_of[child] = parent`, then
   `children_of[parent]` contains `child` exactly once, and vice versa.
3. **No reparenting**: once inserted a node stays under its parent until it
   is removed.

[`position_of`]: StructuralTree::position_of
*/

use crate::types::{NodeId, TreePath};
use std::collections::HashMap;

pub(crate) struct StructuralTree {
  next_id: u32,
  roots: Vec<NodeId>,
  parent_of: HashMap<NodeId, NodeId>,
  children_of: HashMap<NodeId, Vec<NodeId>>,
}

impl StructuralTree {
  pub(crate) fn new() -> Self {
    Self {
      next_id: 1,
      roots: Vec::new(),
      parent_of: HashMap::new(),
      children_of: HashMap::new(),
    }
  }

  /// Whether the node is currently in the tree.
  pub(crate) fn contains(&self, id: NodeId) -> bool {
    self.parent_of.contains_key(&id) || self.roots.contains(&id)
  }

  /// Get parent of a node. `None` for roots and unknown ids.
  pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.parent_of.get(&id).copied()
  }

  /// Get children of a node in order (empty slice if none or not tracked).
  pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
    self.children_of.get(&id).map_or(&[], Vec::as_slice)
  }

  pub(crate) fn roots(&self) -> &[NodeId] {
    &self.roots
  }

  #[cfg(test)]
  pub(crate) fn starting_at(next_id: u32) -> Self {
    Self {
      next_id,
      ..Self::new()
    }
  }

  /// Insert a fresh root-level node. `None` once ids are exhausted.
  pub(crate) fn insert_root(&mut self, position: Option<usize>) -> Option<NodeId> {
    let id = self.issue()?;
    insert_at(&mut self.roots, position, id);
    Some(id)
  }

  /// Insert a fresh node under `parent`.
  /// `None` if the parent is not in the tree or ids are exhausted.
  pub(crate) fn insert_child(&mut self, parent: NodeId, position: Option<usize>) -> Option<NodeId> {
    if !self.contains(parent) {
      log::error!("insert_child: parent {parent} is not in the tree");
      return None;
    }

    let id = self.issue()?;
    self.parent_of.insert(id, parent);
    insert_at(self.children_of.entry(parent).or_default(), position, id);
    Some(id)
  }

  fn issue(&mut self) -> Option<NodeId> {
    let Some(next) = self.next_id.checked_add(1) else {
      log::error!("node ids exhausted, refusing to insert");
      return None;
    };
    let id = NodeId(self.next_id);
    self.next_id = next;
    Some(id)
  }

  /// Remove a node and all its descendants.
  /// Returns removed IDs in removal order (parent before children).
  /// Iterative to avoid stack overflow on deep trees.
  pub(crate) fn remove_subtree(&mut self, root: NodeId) -> Vec<NodeId> {
    if !self.contains(root) {
      return Vec::new();
    }

    let mut removed = Vec::new();
    let mut queue = vec![root];

    while let Some(id) = queue.pop() {
      // Remove from parent's children list (or from the roots)
      if let Some(parent_id) = self.parent_of.remove(&id) {
        if let Some(siblings) = self.children_of.get_mut(&parent_id) {
          siblings.retain(|&sid| sid != id);
        }
      } else {
        self.roots.retain(|&rid| rid != id);
      }

      // Queue children for removal, then remove this node's children list
      if let Some(children) = self.children_of.remove(&id) {
        queue.extend(children.into_iter().rev());
      }

      removed.push(id);
    }

    removed
  }

  /// Current position of a node, recomputed from the live structure.
  pub(crate) fn position_of(&self, id: NodeId) -> Option<TreePath> {
    let mut path = TreePath::default();
    let mut current = id;

    loop {
      match self.parent_of.get(&current) {
        Some(&parent) => {
          path.push(rank(self.children(parent), current)?);
          current = parent;
        }
        None => {
          path.push(rank(&self.roots, current)?);
          break;
        }
      }
    }

    path.reverse();
    Some(path)
  }

  /// Node currently at `path`, if any.
  pub(crate) fn node_at(&self, path: &TreePath) -> Option<NodeId> {
    let (&first, rest) = path.indices().split_first()?;
    let mut current = *self.roots.get(first)?;
    for &rank in rest {
      current = *self.children(current).get(rank)?;
    }
    Some(current)
  }
}

fn insert_at(siblings: &mut Vec<NodeId>, position: Option<usize>, id: NodeId) {
  let at = position.map_or(siblings.len(), |p| p.min(siblings.len()));
  siblings.insert(at, id);
}

fn rank(siblings: &[NodeId], id: NodeId) -> Option<usize> {
  siblings.iter().position(|&sid| sid == id)
}
