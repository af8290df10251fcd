/*!
Page registry - flat ordered pages keyed by stable `PageId`.

Ids start at 1 and are never reused. The index of a page is its rank in the
flat order, computed on demand; it shifts whenever an earlier page goes away,
so it is only ever used to talk to the toolkit.

At most one page is current. Selection hands back the callbacks to run
(deactivate old, then activate new) so the caller can run them after the lock
is released. Callbacks that are replaced or unregistered are handed back the
same way, to be dropped once the lock is gone.
*/

use async_broadcast::Sender;
use std::collections::HashMap;

use crate::callback::Callback;
use crate::events;
use crate::types::{ContentHandle, Event, PageId, UiError, UiResult};

/// Per-page state.
#[derive(Debug, Clone)]
pub(crate) struct PageEntry {
  pub(crate) id: PageId,
  pub(crate) label: String,
  pub(crate) content: ContentHandle,
  /// Unread activity since the page was last selected.
  pub(crate) flagged: bool,
}

/// Callbacks owed by a current-page change, in firing order.
#[derive(Debug, Default)]
pub(crate) struct Transition {
  pub(crate) deactivate: Option<Callback>,
  pub(crate) activate: Option<Callback>,
}

pub(crate) struct PageRegistry {
  events_tx: Sender<Event>,
  next_id: u32,
  pages: Vec<PageEntry>,
  current: Option<PageId>,
  on_current: HashMap<PageId, Callback>,
  on_not_current: HashMap<PageId, Callback>,
}

impl PageRegistry {
  pub(crate) fn new(events_tx: Sender<Event>) -> Self {
    Self {
      events_tx,
      next_id: 1,
      pages: Vec::new(),
      current: None,
      on_current: HashMap::new(),
      on_not_current: HashMap::new(),
    }
  }

  #[cfg(test)]
  fn starting_at(events_tx: Sender<Event>, next_id: u32) -> Self {
    Self {
      next_id,
      ..Self::new(events_tx)
    }
  }

  fn emit(&self, event: Event) {
    events::emit(&self.events_tx, event);
  }

  /// Append a page. Existing ids and indices are untouched.
  pub(crate) fn create(&mut self, label: String, content: ContentHandle) -> UiResult<PageId> {
    let Some(next) = self.next_id.checked_add(1) else {
      log::error!("page ids exhausted, refusing to create {label:?}");
      return Err(UiError::IdsExhausted);
    };
    let id = PageId(self.next_id);
    self.next_id = next;

    self.pages.push(PageEntry {
      id,
      label: label.clone(),
      content,
      flagged: false,
    });
    self.emit(Event::PageAppended {
      page_id: id,
      index: self.pages.len() - 1,
      label,
    });
    Ok(id)
  }

  /// Make `id` current.
  ///
  /// Returns `None` when there is nothing to fire: stale id, or `id` is
  /// already current. Either way a live page's unread flag is cleared.
  pub(crate) fn select(&mut self, id: PageId) -> Option<Transition> {
    let index = self.index_of(id)?;
    self.clear_flag(index);

    if self.current == Some(id) {
      return None;
    }

    let previous = self.current.replace(id);
    self.emit(Event::PageCurrent { page_id: id, index });

    Some(Transition {
      deactivate: previous.and_then(|p| self.on_not_current.get(&p).cloned()),
      activate: self.on_current.get(&id).cloned(),
    })
  }

  fn clear_flag(&mut self, index: usize) {
    let Some(page) = self.pages.get_mut(index) else {
      return;
    };
    if !page.flagged {
      return;
    }
    page.flagged = false;
    let page_id = page.id;
    self.emit(Event::PageFlagged {
      page_id,
      index,
      flagged: false,
    });
  }

  /// Mark unread activity. Publishes only on change.
  pub(crate) fn flag(&mut self, id: PageId) {
    let Some(index) = self.index_of(id) else {
      log::debug!("flag: page {id} is gone, ignoring");
      return;
    };
    let Some(page) = self.pages.get_mut(index) else {
      return;
    };
    if page.flagged {
      return;
    }
    page.flagged = true;
    self.emit(Event::PageFlagged {
      page_id: id,
      index,
      flagged: true,
    });
  }

  /// Set or clear the "became current" callback. No-op on stale ids.
  /// Returns the displaced callback, or `callback` itself if refused.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn set_on_current(
    &mut self,
    id: PageId,
    callback: Option<Callback>,
  ) -> Option<Callback> {
    let live = self.index_of(id).is_some();
    set_or_clear(&mut self.on_current, id, callback, live)
  }

  /// Set or clear the "stopped being current" callback. No-op on stale ids.
  /// Returns the displaced callback, or `callback` itself if refused.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn set_on_not_current(
    &mut self,
    id: PageId,
    callback: Option<Callback>,
  ) -> Option<Callback> {
    let live = self.index_of(id).is_some();
    set_or_clear(&mut self.on_not_current, id, callback, live)
  }

  /// Remove a page and hand back both its callbacks. Does not pick a new
  /// current page.
  #[must_use = "drop released callbacks after the lock is released"]
  pub(crate) fn destroy(&mut self, id: PageId) -> Vec<Callback> {
    let Some(index) = self.index_of(id) else {
      log::debug!("destroy: page {id} already gone");
      return Vec::new();
    };

    let released = self
      .on_current
      .remove(&id)
      .into_iter()
      .chain(self.on_not_current.remove(&id))
      .collect();
    self.pages.remove(index);
    if self.current == Some(id) {
      self.current = None;
    }

    self.emit(Event::PageRemoved { page_id: id, index });
    released
  }

  pub(crate) const fn current(&self) -> Option<PageId> {
    self.current
  }

  pub(crate) fn index_of(&self, id: PageId) -> Option<usize> {
    self.pages.iter().position(|p| p.id == id)
  }

  pub(crate) fn page(&self, id: PageId) -> Option<&PageEntry> {
    self.pages.iter().find(|p| p.id == id)
  }

  pub(crate) fn page_at(&self, index: usize) -> Option<PageId> {
    self.pages.get(index).map(|p| p.id)
  }

  pub(crate) fn page_ids(&self) -> Vec<PageId> {
    self.pages.iter().map(|p| p.id).collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.pages.len()
  }
}

fn set_or_clear(
  map: &mut HashMap<PageId, Callback>,
  id: PageId,
  callback: Option<Callback>,
  live: bool,
) -> Option<Callback> {
  if !live {
    log::debug!("page {id} is gone, ignoring callback change");
    return callback;
  }
  match callback {
    Some(cb) => map.insert(id, cb),
    None => map.remove(&id),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn registry() -> PageRegistry {
    let (mut tx, rx) = async_broadcast::broadcast(16);
    tx.set_overflow(true);
    // Closed channel: emission is a silent no-op
    drop(rx);
    PageRegistry::new(tx)
  }

  #[test]
  fn ids_are_sequential_and_never_reused() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(10)).unwrap();
    let b = pages.create("b".into(), ContentHandle(11)).unwrap();
    assert!(pages.destroy(b).is_empty());
    let c = pages.create("c".into(), ContentHandle(12)).unwrap();

    assert_eq!((a, b, c), (PageId(1), PageId(2), PageId(3)));
    assert_eq!(pages.page_ids(), vec![a, c]);
  }

  #[test]
  fn select_same_page_owes_nothing() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(1)).unwrap();
    assert!(pages.select(a).is_some());
    assert!(pages.select(a).is_none());
    assert_eq!(pages.current(), Some(a));
  }

  #[test]
  fn select_stale_page_changes_nothing() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(1)).unwrap();
    pages.select(a);
    assert!(pages.select(PageId(42)).is_none());
    assert_eq!(pages.current(), Some(a));
  }

  #[test]
  fn callbacks_on_stale_page_are_ignored() {
    let mut pages = registry();
    let refused = pages.set_on_current(PageId(1), Some(Callback::new(|| {})));
    assert!(refused.is_some());
    assert!(pages.on_current.is_empty());
  }

  #[test]
  fn destroy_unregisters_and_clears_current() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(1)).unwrap();
    let b = pages.create("b".into(), ContentHandle(2)).unwrap();
    assert!(pages.set_on_current(a, Some(Callback::new(|| {}))).is_none());
    assert!(pages.set_on_not_current(a, Some(Callback::new(|| {}))).is_none());
    pages.select(a);

    assert_eq!(pages.destroy(a).len(), 2);
    assert!(pages.destroy(a).is_empty());

    assert_eq!(pages.current(), None);
    assert!(pages.on_current.is_empty());
    assert!(pages.on_not_current.is_empty());
    assert_eq!(pages.index_of(b), Some(0));
  }

  #[test]
  fn flag_is_idempotent_and_cleared_by_select() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(1)).unwrap();
    pages.flag(a);
    pages.flag(a);
    assert!(pages.page(a).unwrap().flagged);

    pages.select(a);
    assert!(!pages.page(a).unwrap().flagged);
  }

  #[test]
  fn replacing_callback_hands_back_the_old_one() {
    let mut pages = registry();
    let a = pages.create("a".into(), ContentHandle(1)).unwrap();
    let first = Callback::new(|| {});
    assert!(pages.set_on_current(a, Some(first.clone())).is_none());

    let displaced = pages.set_on_current(a, Some(Callback::new(|| {}))).unwrap();
    assert!(displaced.ptr_eq(&first));
    assert!(pages.set_on_current(a, None).is_some());
    assert!(pages.on_current.is_empty());
  }

  #[test]
  fn exhausted_ids_refuse_creation() {
    let (tx, _rx) = async_broadcast::broadcast(4);
    let mut pages = PageRegistry::starting_at(tx, u32::MAX - 1);
    let last = pages.create("last".into(), ContentHandle(1)).unwrap();
    assert_eq!(last, PageId(u32::MAX - 1));

    assert!(matches!(
      pages.create("late".into(), ContentHandle(2)),
      Err(UiError::IdsExhausted)
    ));
    assert_eq!(pages.page_ids(), vec![last]);
  }
}
