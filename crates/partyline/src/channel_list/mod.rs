/*!
Channel list - a two-level tree of channels and their users, with per-row
activate (double-click) and popup callbacks.

# Module Structure

- `mod.rs` - ChannelList struct, builder, dispatch, toolkit bridge
- `registry/` - Registry with private fields + operations + event emission
- `channel.rs` - `Channel` handle
- `user.rs` - `User` handle

Rows are addressed by [`NodeId`]. A [`TreePath`] only appears at the edge: the
toolkit adapter hands one in when the user clicks a row, it is resolved against
the live structure right away, and dispatch proceeds by identity.

# Example

```
use partyline::{Callback, ChannelList, PopupActions};

let list = ChannelList::new();
let room = list.create_channel("room1")?;
let alice = list.create_user(&room, "alice")?;

alice.set_activate(Some(Callback::new(|| println!("open a private chat"))));
alice.set_secondary(Some(PopupActions::new().with("Kick", || println!("kick"))));

let path = list.position_of(alice.id()).unwrap();
assert!(list.handle_row_activated(&path));
# Ok::<(), partyline::UiError>(())
```
*/

mod channel;
mod registry;
mod user;

pub use channel::Channel;
pub use user::User;

pub(crate) use registry::Registry;

use crate::host::{LogPopup, PathResolver, PopupMenu};
use crate::types::{ButtonPress, Event, NodeId, NodeKind, Point, TreePath, UiError, UiResult};
use async_broadcast::{InactiveReceiver, Receiver};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

const DEFAULT_EVENT_CAPACITY: usize = 1024;
const DEFAULT_COLUMN_TITLE: &str = "Channels";

/// Channel list instance - owns the registry and the event channel.
///
/// Clone is cheap (Arc bumps). Handles created from it keep only a weak
/// reference: once the last clone is dropped, every handle goes stale.
#[derive(Clone)]
pub struct ChannelList {
  state: Arc<RwLock<Registry>>,
  events_keepalive: InactiveReceiver<Event>,
  popup: Arc<dyn PopupMenu>,
  column_title: Arc<str>,
}

impl std::fmt::Debug for ChannelList {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChannelList")
      .field("column_title", &self.column_title)
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a ChannelList.
///
/// # Example
///
/// ```
/// use partyline::ChannelList;
///
/// let list = ChannelList::builder()
///     .column_title("Rooms")
///     .auto_expand(false)
///     .build();
/// assert_eq!(list.column_title(), "Rooms");
/// ```
#[derive(Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct ChannelListBuilder {
  column_title: String,
  event_capacity: usize,
  auto_expand: bool,
  popup: Option<Arc<dyn PopupMenu>>,
}

impl std::fmt::Debug for ChannelListBuilder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChannelListBuilder")
      .field("column_title", &self.column_title)
      .field("event_capacity", &self.event_capacity)
      .field("auto_expand", &self.auto_expand)
      .field("popup", &self.popup.is_some())
      .finish()
  }
}

impl Default for ChannelListBuilder {
  fn default() -> Self {
    Self {
      column_title: DEFAULT_COLUMN_TITLE.to_owned(),
      event_capacity: DEFAULT_EVENT_CAPACITY,
      auto_expand: true,
      popup: None,
    }
  }
}

impl ChannelListBuilder {
  /// Header of the single text column. Default: "Channels".
  pub fn column_title(mut self, title: impl Into<String>) -> Self {
    self.column_title = title.into();
    self
  }

  /// Capacity of the event channel. Oldest events are dropped when full.
  /// Default: 1024.
  pub const fn event_capacity(mut self, capacity: usize) -> Self {
    self.event_capacity = if capacity == 0 { 1 } else { capacity };
    self
  }

  /// Emit `row:expanded` after each user row so its channel opens. Default: true.
  pub const fn auto_expand(mut self, expand: bool) -> Self {
    self.auto_expand = expand;
    self
  }

  /// Presenter for secondary-click menus. Default: one that only logs.
  pub fn popup_menu(mut self, popup: Arc<dyn PopupMenu>) -> Self {
    self.popup = Some(popup);
    self
  }

  /// Create the list.
  pub fn build(self) -> ChannelList {
    let (mut tx, rx) = async_broadcast::broadcast(self.event_capacity);
    tx.set_overflow(true); // Drop oldest messages when full

    ChannelList {
      state: Arc::new(RwLock::new(Registry::new(tx, self.auto_expand))),
      events_keepalive: rx.deactivate(),
      popup: self.popup.unwrap_or_else(|| Arc::new(LogPopup)),
      column_title: self.column_title.into(),
    }
  }
}

impl Default for ChannelList {
  fn default() -> Self {
    Self::new()
  }
}

impl ChannelList {
  /// Create a channel list with default options.
  pub fn new() -> Self {
    Self::builder().build()
  }

  /// Configure a list before building it.
  pub fn builder() -> ChannelListBuilder {
    ChannelListBuilder::default()
  }

  /// Subscribe to row events from this list.
  pub fn subscribe(&self) -> Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  /// Header of the single text column.
  pub fn column_title(&self) -> &str {
    &self.column_title
  }

  /// Read state. Never run callbacks inside the closure.
  #[inline]
  pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. Never run callbacks inside the closure.
  #[inline]
  pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.state.write())
  }

  fn weak(&self) -> Weak<RwLock<Registry>> {
    Arc::downgrade(&self.state)
  }

  /// Append a channel row.
  ///
  /// Fails only once the list has issued every id it can.
  pub fn create_channel(&self, label: impl Into<String>) -> UiResult<Channel> {
    let id = self.write(|r| r.create_channel(label.into()))?;
    Ok(Channel::new(id, self.weak()))
  }

  /// Append a user row under `channel`.
  ///
  /// Fails if the channel has been destroyed or belongs to a list that no
  /// longer exists. Either means the caller kept using a handle it gave up.
  pub fn create_user(&self, channel: &Channel, label: impl Into<String>) -> UiResult<User> {
    if !channel.belongs_to(&self.state) {
      log::error!("create_user: channel {} belongs to another list", channel.id());
      return Err(UiError::ChannelNotLive(channel.id()));
    }
    channel.add_user(label)
  }

  /// Destroy a channel. Its users are detached, not destroyed.
  pub fn destroy_channel(&self, channel: Channel) {
    channel.destroy();
  }

  /// Destroy a user row. Same as dropping its handle.
  pub fn destroy_user(&self, user: User) {
    user.destroy();
  }

  /// Run the node's activate callback. Returns false if there is none.
  pub fn dispatch_activate(&self, id: NodeId) -> bool {
    let Some(callback) = self.read(|r| r.activate_for(id)) else {
      log::debug!("dispatch_activate: no callback for node {id}");
      return false;
    };
    // Lock released: the callback may mutate the list, even destroy this node
    callback.call();
    true
  }

  /// Show the node's popup menu at `at`. Returns false if it has no capability set.
  pub fn dispatch_secondary(&self, id: NodeId, at: Point) -> bool {
    let Some(actions) = self.read(|r| r.secondary_for(id)) else {
      log::debug!("dispatch_secondary: no popup actions for node {id}");
      return false;
    };
    self.popup.show(&actions, at);
    true
  }

  /// Toolkit "row activated" notification.
  pub fn handle_row_activated(&self, path: &TreePath) -> bool {
    match self.node_at(path) {
      Some(id) => self.dispatch_activate(id),
      None => {
        log::debug!("handle_row_activated: no row at {path}");
        false
      }
    }
  }

  /// Toolkit button-press notification. Returns true if a popup was shown;
  /// on false the adapter should let the toolkit's default handling run.
  pub fn handle_button_press(&self, press: &ButtonPress, resolver: &dyn PathResolver) -> bool {
    if !press.opens_popup() {
      return false;
    }
    let Some(path) = resolver.path_at(press.point) else {
      return false;
    };
    let Some(id) = self.node_at(&path) else {
      log::debug!("handle_button_press: no row at {path}");
      return false;
    };
    self.dispatch_secondary(id, press.point)
  }

  /// Current on-screen position of a node.
  pub fn position_of(&self, id: NodeId) -> Option<TreePath> {
    self.read(|r| r.position_of(id))
  }

  /// Node currently at `path`.
  pub fn node_at(&self, path: &TreePath) -> Option<NodeId> {
    self.read(|r| r.node_at(path))
  }

  /// Channel ids in display order.
  pub fn channels(&self) -> Vec<NodeId> {
    self.read(|r| r.channels().to_vec())
  }

  /// User ids under a channel in display order.
  pub fn users_of(&self, channel: NodeId) -> Vec<NodeId> {
    self.read(|r| r.children(channel).to_vec())
  }

  /// Row text. Detached users keep their last one.
  pub fn label_of(&self, id: NodeId) -> Option<String> {
    self.read(|r| r.node(id).map(|n| n.label.clone()))
  }

  /// Whether a node is a channel or a user.
  pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
    self.read(|r| r.node(id).map(|n| n.kind))
  }

  /// Number of nodes that can currently receive callbacks.
  pub fn live_count(&self) -> usize {
    self.read(Registry::registered_count)
  }
}

/// Non-owning link from a handle to its list.
#[derive(Debug, Clone)]
struct NodeRef {
  id: NodeId,
  list: Weak<RwLock<Registry>>,
}

impl NodeRef {
  /// Write to the list if it still exists.
  ///
  /// The result is handed back after the guard is released, so callbacks the
  /// registry gives up can be dropped even when they own handles into it.
  fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> Option<R> {
    let state = self.list.upgrade()?;
    let result = f(&mut state.write());
    Some(result)
  }

  fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> Option<R> {
    let state = self.list.upgrade()?;
    let result = f(&state.read());
    Some(result)
  }

  fn is_live(&self) -> bool {
    self.read(|r| r.is_live(self.id)).unwrap_or(false)
  }

  fn label(&self) -> Option<String> {
    self.read(|r| r.node(self.id).map(|n| n.label.clone())).flatten()
  }

  fn destroy(&self) {
    let Some(released) = self.write(|r| r.destroy(self.id)) else {
      log::debug!("node {} outlived its list", self.id);
      return;
    };
    // Unlocked: dropping these may destroy further nodes
    drop(released);
  }
}


#[cfg(test)]
mod proptests {
  use super::*;
  use crate::callback::Callback;
  use parking_lot::Mutex;
  use proptest::prelude::*;

  #[derive(Debug, Clone)]
  enum Op {
    AddChannel,
    AddUser(usize),
    DropUser(usize),
    DropChannel(usize),
  }

  fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
      1 => Just(Op::AddChannel),
      3 => (0..16usize).prop_map(Op::AddUser),
      2 => (0..32usize).prop_map(Op::DropUser),
      1 => (0..16usize).prop_map(Op::DropChannel),
    ]
  }

  fn pick(len: usize, i: usize) -> Option<usize> {
    (len > 0).then(|| i % len)
  }

  proptest! {
    /// Dispatching at a node's current position always reaches that node's callback
    #[test]
    fn dispatch_by_position_reaches_owner(ops in prop::collection::vec(op(), 1..80)) {
      let list = ChannelList::new();
      let fired: Arc<Mutex<Vec<NodeId>>> = Arc::default();
      let mut channels: Vec<Channel> = Vec::new();
      let mut users: Vec<User> = Vec::new();

      let register = |id: NodeId| {
        let fired = Arc::clone(&fired);
        Callback::new(move || fired.lock().push(id))
      };

      for op in ops {
        match op {
          Op::AddChannel => {
            let channel = list.create_channel("c").unwrap();
            channel.set_activate(Some(register(channel.id())));
            channels.push(channel);
          }
          Op::AddUser(i) => {
            if let Some(i) = pick(channels.len(), i) {
              let user = channels[i].add_user("u").unwrap();
              user.set_activate(Some(register(user.id())));
              users.push(user);
            }
          }
          Op::DropUser(i) => {
            if let Some(i) = pick(users.len(), i) {
              drop(users.remove(i));
            }
          }
          Op::DropChannel(i) => {
            if let Some(i) = pick(channels.len(), i) {
              drop(channels.remove(i));
            }
          }
        }
      }

      for id in channels.iter().map(Channel::id).chain(users.iter().map(User::id)) {
        fired.lock().clear();
        match list.position_of(id) {
          Some(at) => {
            prop_assert!(list.handle_row_activated(&at));
            prop_assert_eq!(fired.lock().clone(), vec![id]);
          }
          None => {
            // Only users of destroyed channels lose their position
            prop_assert!(users.iter().any(|u| u.id() == id && u.is_detached()));
            prop_assert!(!list.dispatch_activate(id));
          }
        }
      }
    }
  }
}
