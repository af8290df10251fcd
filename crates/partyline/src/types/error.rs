/*! Error types for partyline operations.

Only structural contract violations are errors. A missing callback or a
stale handle is not: those degrade to "unhandled" or to a no-op.
*/

use super::NodeId;

/// Errors that indicate a bug at the call site.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
  #[error("Channel {0} is not live")]
  ChannelNotLive(NodeId),

  #[error("Channel list has been dropped")]
  ListDropped,

  #[error("No fresh ids left")]
  IdsExhausted,
}

/// Result type for partyline operations.
pub type UiResult<T> = Result<T, UiError>;
