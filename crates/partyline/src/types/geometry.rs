/*! Screen coordinates and pointer input as delivered by the toolkit adapter. */

use serde::{Deserialize, Serialize};

/// Mouse button number of the secondary (context menu) button.
pub const SECONDARY_BUTTON: u32 = 3;

/// A 2D point in widget coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Press multiplicity reported by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressKind {
  Single,
  Double,
  Triple,
}

/// A button-press event over the channel list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonPress {
  pub button: u32,
  pub kind: PressKind,
  pub point: Point,
}

impl ButtonPress {
  pub const fn new(button: u32, kind: PressKind, point: Point) -> Self {
    Self {
      button,
      kind,
      point,
    }
  }

  /// Single press of the secondary button, the only press that opens a popup.
  pub const fn opens_popup(&self) -> bool {
    self.button == SECONDARY_BUTTON && matches!(self.kind, PressKind::Single)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_single_right_press_opens_popup() {
    let at = Point::new(4.0, 9.0);
    assert!(ButtonPress::new(3, PressKind::Single, at).opens_popup());
    assert!(!ButtonPress::new(3, PressKind::Double, at).opens_popup());
    assert!(!ButtonPress::new(1, PressKind::Single, at).opens_popup());
    assert!(!ButtonPress::new(2, PressKind::Single, at).opens_popup());
  }
}
