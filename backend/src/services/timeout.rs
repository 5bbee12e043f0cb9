//! Restartable one-shot timer
//!
//! [`InactivityTimeoutManager`] runs a callback once after a period of
//! inactivity. Starting it while armed throws the pending deadline away and
//! begins a full new period. The pending timer is a spawned tokio task; its
//! handle is aborted on restart, clear and drop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type BoxFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
type Callback = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

pub struct InactivityTimeoutManager {
    name: String,
    duration: Duration,
    callback: Callback,
    pending: Option<JoinHandle<()>>,
}

impl InactivityTimeoutManager {
    pub fn new<F, Fut>(name: impl Into<String>, duration: Duration, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            duration,
            callback: Arc::new(move || Box::pin(callback()) as BoxFuture),
            pending: None,
        }
    }

    /// Arm the timer for a full period, replacing any pending deadline
    pub fn start_timeout(&mut self) {
        self.abort_pending();

        let name = self.name.clone();
        let duration = self.duration;
        let callback = Arc::clone(&self.callback);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            debug!(timer = %name, "Timeout fired");
            if let Err(e) = callback().await {
                warn!(timer = %name, error = %e, "Timeout callback failed");
            }
        }));
    }

    /// Cancel the pending deadline; no-op when idle
    pub fn clear_timeout(&mut self) {
        self.abort_pending();
    }

    /// Same as [`start_timeout`](Self::start_timeout)
    pub fn reset_timeout(&mut self) {
        self.start_timeout();
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change the period used by the next start; a pending deadline keeps its time
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for InactivityTimeoutManager {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
