/*!
Collaborator traits implemented by the toolkit adapter.

Core code only talks to the toolkit through these. Outbound rendering goes
through [`Event`](crate::Event)s instead.
*/

use crate::callback::PopupActions;
use crate::types::{Point, TreePath};

/// Resolves a widget coordinate to the row under it.
pub trait PathResolver {
  /// Path of the row at `point`, `None` if the point is over empty space.
  fn path_at(&self, point: Point) -> Option<TreePath>;
}

impl<F: Fn(Point) -> Option<TreePath>> PathResolver for F {
  fn path_at(&self, point: Point) -> Option<TreePath> {
    self(point)
  }
}

/// Builds and shows a popup menu. Fire-and-forget: the menu runs the chosen
/// item's action itself, typically via [`PopupActions::activate`].
pub trait PopupMenu: Send + Sync {
  /// Show `actions` at `at`, in widget coordinates.
  fn show(&self, actions: &PopupActions, at: Point);
}

/// Presenter used when the host configured none. Only logs.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LogPopup;

impl PopupMenu for LogPopup {
  fn show(&self, actions: &PopupActions, at: Point) {
    log::debug!(
      "popup with {} item(s) at ({}, {}) but no popup menu is configured",
      actions.len(),
      at.x,
      at.y
    );
  }
}
