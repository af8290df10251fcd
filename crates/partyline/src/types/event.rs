/*! Surface events: every structural change, in the order it happened.

The toolkit adapter mirrors these onto real widgets. Paths and indices are
computed at emission time, so applying events in order reproduces the
structure exactly.
*/

use super::{NodeId, PageId, TreePath};
use serde::Serialize;

/// Events emitted when the channel list or the notebook changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
  // Channel list rows
  #[serde(rename = "row:inserted")]
  RowInserted {
    node_id: NodeId,
    path: TreePath,
    label: String,
  },
  #[serde(rename = "row:changed")]
  RowChanged {
    node_id: NodeId,
    path: TreePath,
    label: String,
  },
  /// Removing a channel row takes its user rows with it.
  #[serde(rename = "row:removed")]
  RowRemoved { node_id: NodeId, path: TreePath },
  #[serde(rename = "row:expanded")]
  RowExpanded { path: TreePath },
  #[serde(rename = "node:detached")]
  NodeDetached { node_id: NodeId },

  // Notebook pages
  #[serde(rename = "page:appended")]
  PageAppended {
    page_id: PageId,
    index: usize,
    label: String,
  },
  #[serde(rename = "page:removed")]
  PageRemoved { page_id: PageId, index: usize },
  #[serde(rename = "page:current")]
  PageCurrent { page_id: PageId, index: usize },
  /// Unread-activity marker on a tab label.
  #[serde(rename = "page:flagged")]
  PageFlagged {
    page_id: PageId,
    index: usize,
    flagged: bool,
  },
}
