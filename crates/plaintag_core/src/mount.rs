//! Mount root readiness
//!
//! Loads may be requested before the document body exists. [`MountWaiter`]
//! suspends until [`Document::attach_body`](plaintag_dom::Document::attach_body)
//! fires the document's mount signal.

use std::time::Duration;

use plaintag_dom::{SharedDocument, SharedMountSignal};

/// The mount root did not appear in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountTimedOut;

/// Gate that resolves once the document has a mount root
#[derive(Debug, Clone)]
pub struct MountWaiter {
    signal: SharedMountSignal,
    timeout: Option<Duration>,
}

impl MountWaiter {
    /// Waiter for `document`, optionally bounded by `timeout`
    pub fn new(document: &SharedDocument, timeout: Option<Duration>) -> Self {
        let signal = match document.lock() {
            Ok(doc) => doc.mount_signal(),
            Err(poisoned) => poisoned.into_inner().mount_signal(),
        };
        Self { signal, timeout }
    }

    /// Whether waiting would return immediately
    pub fn is_ready(&self) -> bool {
        self.signal.is_ready()
    }

    /// Suspend until the mount root exists
    pub async fn wait(&self) -> Result<(), MountTimedOut> {
        if self.signal.is_ready() {
            return Ok(());
        }

        tracing::debug!("waiting for mount root");
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.signal.wait())
                .await
                .map_err(|_| MountTimedOut),
            None => {
                self.signal.wait().await;
                Ok(())
            }
        }
    }
}
