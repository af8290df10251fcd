/*!
Partyline - UI plumbing for a secure group-chat plugin

A channel list (channels with their users underneath), a notebook of chat
tabs, and a per-conversation toggle for the secure session. The toolkit stays
outside: it renders from the [`Event`] stream and reports clicks back through
the `handle_*` methods.

```
use partyline::{ButtonPress, Callback, ChannelList, Point, PressKind, PopupActions, TreePath};

let list = ChannelList::builder().column_title("Rooms").build();
let mut events = list.subscribe();

let room = list.create_channel("room1")?;
let bob = room.add_user("bob")?;
bob.set_secondary(Some(PopupActions::new().with("Whois", || println!("whois bob"))));

// The toolkit resolves the pointer to a row; dispatch goes by identity.
let press = ButtonPress::new(3, PressKind::Single, Point::new(10.0, 24.0));
let resolver = |_: Point| Some(TreePath::from(vec![0, 0]));
assert!(list.handle_button_press(&press, &resolver));

// Row events arrive in order.
while let Ok(event) = events.try_recv() {
    println!("{event:?}");
}
# Ok::<(), partyline::UiError>(())
```
*/

mod callback;
mod channel_list;
mod events;
mod host;
mod notebook;
mod toggle;

#[cfg(test)]
mod testing;

mod types;
pub use types::*;

pub use crate::callback::{Callback, PopupActions, PopupItem};
pub use crate::channel_list::{Channel, ChannelList, ChannelListBuilder, User};
pub use crate::host::{PathResolver, PopupMenu};
pub use crate::notebook::{Notebook, NotebookBuilder, Page};
pub use crate::toggle::{
  MemoryPreferences, Preferences, SecureSession, SessionFactory, ToggleButton, ToggleConfig,
  ToggleMode, ONE_SHOT_LABEL, TOGGLE_LABEL,
};
