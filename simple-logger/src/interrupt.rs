use std::cell::Cell;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

/// Cancellation token for a run.
///
/// The emission loop polls it between ticks and blocks on it while sleeping,
/// so an interrupt during the sleep is observed immediately.
#[derive(Debug)]
pub struct Interrupt {
    tx: Sender<()>,
    rx: Receiver<()>,
    fired: Cell<bool>,
}

/// Cloneable trigger for an [`Interrupt`], safe to move into other threads.
#[derive(Debug, Clone)]
pub struct InterruptHandle(Sender<()>);

impl Interrupt {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            tx,
            rx,
            fired: Cell::new(false),
        }
    }

    pub fn handle(&self) -> InterruptHandle {
        InterruptHandle(self.tx.clone())
    }

    /// Routes SIGINT (Ctrl+C) into this token. Can only be done once per process.
    pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let handle = self.handle();
        ctrlc::set_handler(move || handle.trigger())
    }

    /// Non-blocking check.
    pub fn is_triggered(&self) -> bool {
        if !self.fired.get() && self.rx.try_recv().is_ok() {
            self.fired.set(true);
        }
        self.fired.get()
    }

    /// Sleeps for `timeout` unless interrupted first. Returns `true` when interrupted.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.fired.get() {
            return true;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(()) => {
                self.fired.set(true);
                true
            }
            // `self.tx` keeps the channel open, so it never disconnects.
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptHandle {
    pub fn trigger(&self) {
        // A full channel already carries a pending interrupt.
        let _ = self.0.try_send(());
    }
}
