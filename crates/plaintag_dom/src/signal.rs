//! One-shot mount readiness signal
//!
//! Fired by [`Document::attach_body`](crate::Document::attach_body) when the
//! mount root becomes available. Waiters that arrive after the signal fired
//! resolve immediately; the signal never resets.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Shared readiness flag plus wakeup notification
#[derive(Debug, Default)]
pub struct MountSignal {
    ready: AtomicBool,
    notify: Notify,
}

/// Shared handle to a mount signal
pub type SharedMountSignal = Arc<MountSignal>;

impl MountSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signal that has already fired
    pub fn ready() -> Self {
        let signal = Self::new();
        signal.ready.store(true, Ordering::SeqCst);
        signal
    }

    /// Whether the mount root exists
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Mark the mount root as available and wake every waiter.
    ///
    /// Returns `false` if the signal had already fired.
    pub fn fire(&self) -> bool {
        let first = !self.ready.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// Wait until the signal fires. Returns immediately if it already has.
    pub async fn wait(&self) {
        loop {
            // Register interest before checking the flag so a concurrent
            // `fire` cannot slip between the check and the await.
            let notified = self.notify.notified();

            if self.is_ready() {
                return;
            }

            notified.await;
        }
    }
}
