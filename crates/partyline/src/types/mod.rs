/*! Core types shared by the channel list, the notebook and the toggle button. */

#![allow(missing_docs)]

mod error;
mod event;
mod geometry;
mod ids;
mod path;

pub use error::{UiError, UiResult};
pub use event::Event;
pub use geometry::{ButtonPress, PressKind, Point, SECONDARY_BUTTON};
pub use ids::{ContentHandle, NodeId, NodeKind, PageId};
pub use path::{ParsePathError, TreePath};
