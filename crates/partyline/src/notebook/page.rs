/*! Page handle. Dropping it removes the page. */

use super::{run_select, PageRegistry};
use crate::callback::Callback;
use crate::types::{ContentHandle, PageId};
use parking_lot::RwLock;
use std::sync::Weak;

/// A notebook page. Created by [`Notebook::create_page`](super::Notebook::create_page).
#[derive(Debug)]
#[must_use = "dropping a Page removes it"]
pub struct Page {
  id: PageId,
  notebook: Weak<RwLock<PageRegistry>>,
}

impl Page {
  pub(super) const fn new(id: PageId, notebook: Weak<RwLock<PageRegistry>>) -> Self {
    Self { id, notebook }
  }

  /// Stable identity of the page.
  pub const fn id(&self) -> PageId {
    self.id
  }

  fn read<R>(&self, f: impl FnOnce(&PageRegistry) -> R) -> Option<R> {
    let state = self.notebook.upgrade()?;
    let result = f(&state.read());
    Some(result)
  }

  /// Write if the notebook still exists. The result is returned after the
  /// guard is released.
  fn write<R>(&self, f: impl FnOnce(&mut PageRegistry) -> R) -> Option<R> {
    let state = self.notebook.upgrade()?;
    let result = f(&mut state.write());
    Some(result)
  }

  /// Make this the current page. See [`Notebook::select_page`](super::Notebook::select_page).
  pub fn set_current(&self) -> bool {
    self
      .notebook
      .upgrade()
      .is_some_and(|state| run_select(&state, self.id))
  }

  /// Whether this is the selected page.
  pub fn is_current(&self) -> bool {
    self.read(|r| r.current() == Some(self.id)).unwrap_or(false)
  }

  /// Run `callback` whenever this page becomes current. `None` clears it.
  pub fn on_set_current(&self, callback: Option<Callback>) {
    self.write(|r| r.set_on_current(self.id, callback));
  }

  /// Run `callback` whenever this page stops being current. `None` clears it.
  pub fn on_set_not_current(&self, callback: Option<Callback>) {
    self.write(|r| r.set_on_not_current(self.id, callback));
  }

  /// Flag unread activity until the page is next selected.
  pub fn notify(&self) {
    self.write(|r| r.flag(self.id));
  }

  /// Tab label. `None` once the page or notebook is gone.
  pub fn label(&self) -> Option<String> {
    self.read(|r| r.page(self.id).map(|p| p.label.clone())).flatten()
  }

  /// Content shown in the page.
  pub fn content(&self) -> Option<ContentHandle> {
    self.read(|r| r.page(self.id).map(|p| p.content)).flatten()
  }

  /// Current tab index. Shifts when earlier pages go away.
  pub fn index(&self) -> Option<usize> {
    self.read(|r| r.index_of(self.id)).flatten()
  }

  /// Remove now rather than at end of scope.
  pub fn destroy(self) {
    // Drop does the work
  }
}

impl Drop for Page {
  fn drop(&mut self) {
    let Some(released) = self.write(|r| r.destroy(self.id)) else {
      log::debug!("page {} outlived its notebook", self.id);
      return;
    };
    // Unlocked: these may own other pages
    drop(released);
  }
}
