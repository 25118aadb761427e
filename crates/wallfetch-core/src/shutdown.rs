//! Process-wide cancellation: one trigger, any number of listeners.
//!
//! The CLI triggers it on SIGINT/SIGTERM; the scheduler's timer loop listens
//! and stops launching cycles once it fires.

use tokio::sync::watch;

/// Sending half. Dropping it also counts as cancellation.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Receiving half; clone one per task that needs to observe shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

pub fn channel() -> (Shutdown, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (Shutdown { tx }, ShutdownListener { rx })
}

impl Shutdown {
    /// Fire the signal. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownListener {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once shutdown has been triggered (or the trigger was dropped).
    pub async fn cancelled(&mut self) {
        // Err means the sender is gone.
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}
