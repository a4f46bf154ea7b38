//! Stop signal for the simulation worker
//!
//! Every sleep of the worker goes through [`StopSignal::wait`], which
//! returns early as soon as a stop is requested. Dropping the
//! [`StopHandle`] counts as a stop request too.

use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Requesting side, kept by the simulator
#[derive(Debug)]
pub struct StopHandle {
    tx: Sender<()>,
}

/// Waiting side, moved into the worker
#[derive(Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
    stopped: Cell<bool>,
}

/// Create a connected handle/signal pair
pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (
        StopHandle { tx },
        StopSignal {
            rx,
            stopped: Cell::new(false),
        },
    )
}

impl StopHandle {
    /// Ask the worker to stop at its next suspension point
    pub fn request_stop(&self) {
        // Receiver gone means the worker already exited
        let _ = self.tx.send(());
    }
}

impl StopSignal {
    /// Sleep for `duration`, returning `false` if a stop was requested
    /// before or during the wait.
    ///
    /// Once a stop has been seen every later call returns `false` at once.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.stopped.get() {
            return false;
        }
        match self.rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => true,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.stopped.set(true);
                false
            }
        }
    }

    /// Non-blocking check. Does not consume the request.
    pub fn is_stop_requested(&self) -> bool {
        !self.wait(Duration::ZERO)
    }
}
