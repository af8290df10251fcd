/*!
Notebook - a tab strip whose pages carry "became current" and "stopped being
current" callbacks.

Pages are keyed by [`PageId`]. The toolkit reports selection changes by tab
index; [`Notebook::handle_page_switched`] translates the index to an id at that
moment and never stores it.

# Example

```
use partyline::{Callback, ContentHandle, Notebook};

let notebook = Notebook::new();
let lobby = notebook.create_page("lobby", ContentHandle(1))?;
let room = notebook.create_page("room", ContentHandle(2))?;

room.on_set_current(Some(Callback::new(|| println!("room shown"))));
lobby.on_set_not_current(Some(Callback::new(|| println!("lobby hidden"))));

notebook.select_page(lobby.id());
assert!(notebook.select_page(room.id()));
# Ok::<(), partyline::UiError>(())
```
*/

mod page;
mod registry;

pub use page::Page;

pub(crate) use registry::PageRegistry;

use crate::callback::Callback;
use crate::types::{ContentHandle, Event, PageId, UiResult};
use async_broadcast::{InactiveReceiver, Receiver};
use parking_lot::RwLock;
use std::sync::Arc;

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Notebook instance - owns the page registry and the event channel.
///
/// Clone is cheap (Arc bumps). Pages keep only a weak reference.
#[derive(Clone)]
pub struct Notebook {
  state: Arc<RwLock<PageRegistry>>,
  events_keepalive: InactiveReceiver<Event>,
}

impl std::fmt::Debug for Notebook {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Notebook").finish_non_exhaustive()
  }
}

/// Builder for configuring a Notebook.
#[derive(Debug, Clone, Copy)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct NotebookBuilder {
  event_capacity: usize,
}

impl Default for NotebookBuilder {
  fn default() -> Self {
    Self {
      event_capacity: DEFAULT_EVENT_CAPACITY,
    }
  }
}

impl NotebookBuilder {
  /// Capacity of the event channel. Oldest events are dropped when full.
  /// Default: 256.
  pub const fn event_capacity(mut self, capacity: usize) -> Self {
    self.event_capacity = if capacity == 0 { 1 } else { capacity };
    self
  }

  /// Create the notebook.
  pub fn build(self) -> Notebook {
    let (mut tx, rx) = async_broadcast::broadcast(self.event_capacity);
    tx.set_overflow(true); // Drop oldest messages when full

    Notebook {
      state: Arc::new(RwLock::new(PageRegistry::new(tx))),
      events_keepalive: rx.deactivate(),
    }
  }
}

impl Default for Notebook {
  fn default() -> Self {
    Self::new()
  }
}

/// Apply a selection, then fire its callbacks with the lock released.
fn run_select(state: &RwLock<PageRegistry>, id: PageId) -> bool {
  let transition = state.write().select(id);
  let Some(transition) = transition else {
    return false;
  };

  if let Some(deactivate) = transition.deactivate {
    deactivate.call();
  }
  match transition.activate {
    Some(activate) => {
      activate.call();
      true
    }
    None => false,
  }
}

impl Notebook {
  /// Create a notebook with default options.
  pub fn new() -> Self {
    Self::builder().build()
  }

  /// Configure a notebook before building it.
  pub fn builder() -> NotebookBuilder {
    NotebookBuilder::default()
  }

  /// Subscribe to page events from this notebook.
  pub fn subscribe(&self) -> Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  #[inline]
  fn read<R>(&self, f: impl FnOnce(&PageRegistry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. The result outlives the guard, so callbacks handed back by
  /// the registry are dropped unlocked.
  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut PageRegistry) -> R) -> R {
    f(&mut self.state.write())
  }

  /// Append a page. Ids start at 1 and are never reused.
  ///
  /// Fails only once the notebook has issued every id it can.
  pub fn create_page(&self, label: impl Into<String>, content: ContentHandle) -> UiResult<Page> {
    let id = self.write(|r| r.create(label.into(), content))?;
    Ok(Page::new(id, Arc::downgrade(&self.state)))
  }

  /// Remove a page now. Same as dropping its handle.
  pub fn destroy_page(&self, page: Page) {
    page.destroy();
  }

  /// Make `id` the current page.
  ///
  /// Fires the old page's deactivate callback, then `id`'s activate callback.
  /// Returns true only if an activate callback ran; on false the host may
  /// apply its own default. Selecting the current page or a stale id fires
  /// nothing and returns false.
  pub fn select_page(&self, id: PageId) -> bool {
    run_select(&self.state, id)
  }

  /// Toolkit "switch page" notification carrying a tab index.
  pub fn handle_page_switched(&self, index: usize) -> bool {
    match self.page_at(index) {
      Some(id) => self.select_page(id),
      None => {
        log::debug!("handle_page_switched: no page at index {index}");
        false
      }
    }
  }

  /// Set or clear the callback fired when `id` becomes current.
  pub fn on_page_activate(&self, id: PageId, callback: Option<Callback>) {
    self.write(|r| r.set_on_current(id, callback));
  }

  /// Set or clear the callback fired when `id` stops being current.
  pub fn on_page_deactivate(&self, id: PageId, callback: Option<Callback>) {
    self.write(|r| r.set_on_not_current(id, callback));
  }

  /// Flag unread activity on `id` until it is next selected.
  pub fn notify_page(&self, id: PageId) {
    self.write(|r| r.flag(id));
  }

  /// The selected page, if any. Destroying it leaves none selected.
  pub fn current_page(&self) -> Option<PageId> {
    self.read(PageRegistry::current)
  }

  /// Page ids in tab order.
  pub fn page_ids(&self) -> Vec<PageId> {
    self.read(PageRegistry::page_ids)
  }

  /// Current tab index of a page.
  pub fn index_of(&self, id: PageId) -> Option<usize> {
    self.read(|r| r.index_of(id))
  }

  /// Page shown at a tab index.
  pub fn page_at(&self, index: usize) -> Option<PageId> {
    self.read(|r| r.page_at(index))
  }

  /// Tab label of a page.
  pub fn label_of(&self, id: PageId) -> Option<String> {
    self.read(|r| r.page(id).map(|p| p.label.clone()))
  }

  /// Caller-owned content shown in a page.
  pub fn content_of(&self, id: PageId) -> Option<ContentHandle> {
    self.read(|r| r.page(id).map(|p| p.content))
  }

  /// Whether a page has unread activity.
  pub fn is_flagged(&self, id: PageId) -> bool {
    self.read(|r| r.page(id).is_some_and(|p| p.flagged))
  }

  /// Number of pages.
  pub fn len(&self) -> usize {
    self.read(PageRegistry::len)
  }

  /// Whether the notebook has no pages.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::without_deadlock;
  use parking_lot::Mutex;

  #[derive(Debug, Clone, PartialEq, Eq)]
  enum Fired {
    Activate(PageId),
    Deactivate(PageId),
  }

  type Log = Arc<Mutex<Vec<Fired>>>;

  fn track(notebook: &Notebook, log: &Log, page: &Page) {
    let id = page.id();
    let on = Arc::clone(log);
    let off = Arc::clone(log);
    notebook.on_page_activate(
      id,
      Some(Callback::new(move || on.lock().push(Fired::Activate(id)))),
    );
    notebook.on_page_deactivate(
      id,
      Some(Callback::new(move || off.lock().push(Fired::Deactivate(id)))),
    );
  }

  fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
      events.push(event);
    }
    events
  }

  #[test]
  fn deactivate_fires_before_activate() {
    let notebook = Notebook::new();
    let log = Log::default();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    assert_eq!((a.id(), b.id()), (PageId(1), PageId(2)));
    track(&notebook, &log, &a);
    track(&notebook, &log, &b);

    assert!(notebook.select_page(a.id()));
    log.lock().clear();

    assert!(notebook.select_page(b.id()));
    assert_eq!(*log.lock(), vec![Fired::Deactivate(a.id()), Fired::Activate(b.id())]);

    // Already current: neither fires
    log.lock().clear();
    assert!(!notebook.select_page(b.id()));
    assert!(log.lock().is_empty());
    assert_eq!(notebook.current_page(), Some(b.id()));
  }

  #[test]
  fn select_without_activate_still_moves_current() {
    let notebook = Notebook::new();
    let log = Log::default();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    track(&notebook, &log, &a);

    notebook.select_page(a.id());
    log.lock().clear();

    assert!(!notebook.select_page(b.id()));
    assert_eq!(notebook.current_page(), Some(b.id()));
    assert_eq!(*log.lock(), vec![Fired::Deactivate(a.id())]);
  }

  #[test]
  fn destroying_current_page_leaves_no_current() {
    let notebook = Notebook::new();
    let log = Log::default();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    track(&notebook, &log, &a);
    track(&notebook, &log, &b);
    notebook.select_page(a.id());
    log.lock().clear();

    notebook.destroy_page(a);

    assert_eq!(notebook.current_page(), None);
    assert!(log.lock().is_empty());

    // Nothing to deactivate on the next selection
    assert!(notebook.select_page(b.id()));
    assert_eq!(*log.lock(), vec![Fired::Activate(b.id())]);
  }

  #[test]
  fn switch_by_index_resolves_after_removal() {
    let notebook = Notebook::new();
    let log = Log::default();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    let c = notebook.create_page("C", ContentHandle(3)).unwrap();
    for page in [&a, &b, &c] {
      track(&notebook, &log, page);
    }

    b.destroy();

    // Index 1 is now C, not the destroyed B
    assert!(notebook.handle_page_switched(1));
    assert_eq!(*log.lock(), vec![Fired::Activate(c.id())]);
    assert_eq!(c.index(), Some(1));
    assert!(!notebook.handle_page_switched(2));
  }

  #[test]
  fn ids_are_not_reused() {
    let notebook = Notebook::new();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let a_id = a.id();
    a.destroy();
    let b = notebook.create_page("B", ContentHandle(1)).unwrap();

    assert_ne!(b.id(), a_id);
    assert!(!notebook.select_page(a_id));
    assert_eq!(notebook.page_ids(), vec![b.id()]);
  }

  #[test]
  fn notify_flags_until_next_selection() {
    let notebook = Notebook::new();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    a.set_current();

    notebook.notify_page(b.id());
    assert!(notebook.is_flagged(b.id()));

    a.set_current();
    assert!(notebook.is_flagged(b.id()));

    b.set_current();
    assert!(!notebook.is_flagged(b.id()));
    assert!(b.is_current());
    assert!(!a.is_current());
  }

  #[test]
  fn callback_may_destroy_another_page() {
    let notebook = Notebook::new();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    let slot = Arc::new(Mutex::new(Some(a)));

    let inner = Arc::clone(&slot);
    b.on_set_current(Some(Callback::new(move || drop(inner.lock().take()))));

    assert!(b.set_current());
    assert_eq!(notebook.page_ids(), vec![b.id()]);
    assert!(slot.lock().is_none());
  }

  #[test]
  fn destroying_page_drops_the_page_its_callback_owned() {
    without_deadlock(|| {
      let notebook = Notebook::new();
      let a = notebook.create_page("A", ContentHandle(1)).unwrap();
      let b = notebook.create_page("B", ContentHandle(2)).unwrap();

      b.on_set_current(Some(Callback::new(move || a.notify())));
      drop(b);

      assert!(notebook.is_empty());
    });
  }

  #[test]
  fn replacing_page_callback_drops_the_page_it_owned() {
    without_deadlock(|| {
      let notebook = Notebook::new();
      let a = notebook.create_page("A", ContentHandle(1)).unwrap();
      let b = notebook.create_page("B", ContentHandle(2)).unwrap();
      let c = notebook.create_page("C", ContentHandle(3)).unwrap();
      let a_id = a.id();

      a.on_set_not_current(Some(Callback::new(move || b.notify())));
      notebook.on_page_deactivate(a_id, None);
      assert_eq!(notebook.page_ids(), vec![a_id, c.id()]);

      a.on_set_current(Some(Callback::new(move || c.notify())));
      a.on_set_current(Some(Callback::new(|| {})));
      assert_eq!(notebook.page_ids(), vec![a_id]);
      assert!(a.set_current());
    });
  }

  #[test]
  fn refused_page_callback_releases_its_page() {
    without_deadlock(|| {
      let notebook = Notebook::new();
      let a = notebook.create_page("A", ContentHandle(1)).unwrap();
      let b = notebook.create_page("B", ContentHandle(2)).unwrap();
      let stale = a.id();
      a.destroy();

      notebook.on_page_activate(stale, Some(Callback::new(move || b.notify())));
      assert!(notebook.is_empty());
    });
  }

  #[test]
  fn zero_event_capacity_keeps_the_latest_event() {
    let notebook = Notebook::builder().event_capacity(0).build();
    let mut rx = notebook.subscribe();
    let _a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();

    assert_eq!(rx.try_recv(), Err(async_broadcast::TryRecvError::Overflowed(1)));
    assert_eq!(
      rx.try_recv(),
      Ok(Event::PageAppended {
        page_id: b.id(),
        index: 1,
        label: "B".into(),
      })
    );
  }

  #[test]
  fn events_mirror_tabs() {
    let notebook = Notebook::new();
    let mut rx = notebook.subscribe();
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();
    b.notify();
    b.set_current();
    let (a_id, b_id) = (a.id(), b.id());
    a.destroy();

    assert_eq!(
      drain(&mut rx),
      vec![
        Event::PageAppended {
          page_id: a_id,
          index: 0,
          label: "A".into(),
        },
        Event::PageAppended {
          page_id: b_id,
          index: 1,
          label: "B".into(),
        },
        Event::PageFlagged {
          page_id: b_id,
          index: 1,
          flagged: true,
        },
        Event::PageFlagged {
          page_id: b_id,
          index: 1,
          flagged: false,
        },
        Event::PageCurrent {
          page_id: b_id,
          index: 1,
        },
        Event::PageRemoved {
          page_id: a_id,
          index: 0,
        },
      ]
    );
  }

  #[test]
  fn pages_outlive_their_notebook() {
    let notebook = Notebook::new();
    let page = notebook.create_page("A", ContentHandle(7)).unwrap();
    assert_eq!(page.content(), Some(ContentHandle(7)));
    assert_eq!(page.label().as_deref(), Some("A"));
    drop(notebook);

    assert!(!page.set_current());
    assert!(!page.is_current());
    assert_eq!(page.label(), None);
    page.notify();
    page.on_set_current(Some(Callback::new(|| {})));
  }

  #[test]
  fn queries_reflect_pages() {
    let notebook = Notebook::builder().event_capacity(8).build();
    assert!(notebook.is_empty());
    let a = notebook.create_page("A", ContentHandle(1)).unwrap();
    let b = notebook.create_page("B", ContentHandle(2)).unwrap();

    assert_eq!(notebook.len(), 2);
    assert_eq!(notebook.index_of(b.id()), Some(1));
    assert_eq!(notebook.page_at(0), Some(a.id()));
    assert_eq!(notebook.label_of(a.id()).as_deref(), Some("A"));
    assert_eq!(notebook.content_of(b.id()), Some(ContentHandle(2)));
  }
}
