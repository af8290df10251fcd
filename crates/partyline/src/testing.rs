/*! Test helpers. */

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Run `test` on its own thread and fail if it does not finish in time.
///
/// For tests whose failure mode is a lock taken twice on one thread, which
/// would otherwise hang the whole test run.
pub(crate) fn without_deadlock(test: impl FnOnce() + Send + 'static) {
  let (done_tx, done_rx) = mpsc::channel();
  let worker = thread::spawn(move || {
    test();
    done_tx.send(()).ok();
  });

  match done_rx.recv_timeout(Duration::from_secs(3)) {
    Ok(()) => {}
    Err(mpsc::RecvTimeoutError::Disconnected) => {
      // The test panicked: surface its message
      if let Err(panic) = worker.join() {
        std::panic::resume_unwind(panic);
      }
    }
    Err(mpsc::RecvTimeoutError::Timeout) => panic!("test did not finish, lock re-entered?"),
  }
}
