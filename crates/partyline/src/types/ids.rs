/*! Branded ID types for type-safe node and page references.

Ids are issued by the owning registry from a per-registry counter that starts
at 1 and only ever increases, so an id is never handed out twice while the
registry lives. Once the counter is spent, creation fails instead of wrapping.
*/

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Identity of a row in the channel list (a channel or a user).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  From,
  Into,
)]
pub struct NodeId(pub u32);

/// Identity of a notebook page.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  From,
  Into,
)]
pub struct PageId(pub u32);

/// Caller-owned page content (e.g. a widget pointer the adapter keeps in a side table).
/// The notebook stores it and hands it back, it never dereferences it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct ContentHandle(pub u64);

/// The two kinds of row in the channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
  /// Root-level row.
  Channel,
  /// Child of a channel.
  User,
}
