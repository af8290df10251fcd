/*! Event publication shared by the channel list and the notebook. */

use crate::types::Event;
use async_broadcast::Sender;

/// Publish an event without blocking.
///
/// The channels run in overflow mode: when full, the oldest queued event is
/// evicted to make room and subscribers see a lag on their next receive.
/// With no active subscriber the event is simply discarded.
pub(crate) fn emit(tx: &Sender<Event>, event: Event) {
  match tx.try_broadcast(event) {
    Ok(None) => {}
    Ok(Some(evicted)) => {
      log::warn!(
        "Event channel full - evicted {evicted:?}. \
         Consider increasing event_capacity or draining events faster."
      );
    }
    Err(e) if e.is_full() => {
      log::error!("Event channel full without overflow - event dropped");
    }
    // Inactive or closed: nobody is listening
    Err(_) => {}
  }
}
