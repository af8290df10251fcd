/*!
Tree paths: the position of a row as a sequence of sibling ranks.

A `TreePath` is a projection of the current structure, valid only until the
next insert or remove. It is the currency for talking to the toolkit about
on-screen rows and must never be kept as a lookup key. Identity lives in
[`NodeId`](super::NodeId).

The textual form matches the toolkit's path strings: ranks joined by `:`
(`"0"`, `"2:1"`).
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sibling ranks from the forest root down to a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<usize>);

impl TreePath {
  pub const fn new(indices: Vec<usize>) -> Self {
    Self(indices)
  }

  pub fn indices(&self) -> &[usize] {
    &self.0
  }

  /// Number of ranks. 1 for a channel row, 2 for a user row.
  pub fn depth(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Path of the enclosing row, `None` for root-level rows.
  pub fn parent(&self) -> Option<Self> {
    match self.0.split_last() {
      Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
      _ => None,
    }
  }

  pub(crate) fn push(&mut self, rank: usize) {
    self.0.push(rank);
  }

  pub(crate) fn reverse(&mut self) {
    self.0.reverse();
  }
}

impl From<Vec<usize>> for TreePath {
  fn from(indices: Vec<usize>) -> Self {
    Self(indices)
  }
}

impl fmt::Display for TreePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, rank) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(":")?;
      }
      write!(f, "{rank}")?;
    }
    Ok(())
  }
}

/// A path string that is empty or has a non-numeric segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid tree path: {0:?}")]
pub struct ParsePathError(pub String);

impl FromStr for TreePath {
  type Err = ParsePathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.is_empty() {
      return Err(ParsePathError(s.to_owned()));
    }
    s.split(':')
      .map(str::parse::<usize>)
      .collect::<Result<Vec<_>, _>>()
      .map(Self)
      .map_err(|_| ParsePathError(s.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn displays_like_toolkit_path_strings() {
    assert_eq!(TreePath::new(vec![0]).to_string(), "0");
    assert_eq!(TreePath::new(vec![2, 1]).to_string(), "2:1");
  }

  #[test]
  fn parses_toolkit_path_strings() {
    assert_eq!("3:0".parse::<TreePath>(), Ok(TreePath::new(vec![3, 0])));
    assert!("".parse::<TreePath>().is_err());
    assert!("1:x".parse::<TreePath>().is_err());
    assert!("-1".parse::<TreePath>().is_err());
  }

  #[test]
  fn parent_of_user_row_is_channel_row() {
    let user = TreePath::new(vec![4, 2]);
    assert_eq!(user.parent(), Some(TreePath::new(vec![4])));
    assert_eq!(TreePath::new(vec![4]).parent(), None);
  }
}
