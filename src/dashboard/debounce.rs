//! Explicit cancellable delayed task for the doctor-search field: each
//! keystroke reschedules, cancelling the pending run, and the action fires
//! once the input has settled for the delay.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Settle delay for the doctor-search field in the edit panel.
pub const DOCTOR_SEARCH_DELAY: Duration = Duration::from_millis(500);

pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    /// Schedule `action` to run after the delay, cancelling any run still
    /// pending from an earlier call.
    pub fn schedule<F, Fut>(&mut self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action().await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
