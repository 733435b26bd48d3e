//! Score synchronization with the backing store.
//!
//! The store is an append-only counter: every call adds `points` to the
//! actor's persisted total. Deltas are independent additions, so calls may
//! complete in any order, but a duplicated or lost call still corrupts the
//! total. Callers issue at most one sync per genuine completion.

pub mod dispatcher;
pub mod http;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub use dispatcher::{SyncDispatcher, SyncOutcome, SyncReport};
pub use http::HttpSyncer;

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Store answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid sync endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Sync timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store rejected delta: {0}")]
    Rejected(String),
}

/// Capability that forwards a point delta to persistent storage.
pub trait Syncer: Send + Sync + 'static {
    /// Add `points` to the stored total of `actor_id`.
    fn sync(
        &self,
        actor_id: &str,
        points: u32,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// Syncer that only logs the delta after a simulated round trip.
///
/// Stands in for the real store in demos and offline runs.
#[derive(Debug, Clone)]
pub struct LogSyncer {
    latency: Duration,
}

impl LogSyncer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for LogSyncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

impl Syncer for LogSyncer {
    async fn sync(&self, actor_id: &str, points: u32) -> Result<(), SyncError> {
        tracing::info!(actor_id, points, "syncing score delta");
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryStore {
    calls: Vec<(String, u32)>,
    totals: HashMap<String, u64>,
}

/// In-memory additive store, used as a test double and for local runs.
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemorySyncer {
    store: Arc<Mutex<MemoryStore>>,
    delay: Duration,
    fail_with: Option<String>,
}

impl MemorySyncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with [`SyncError::Rejected`] after recording it.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every call received, in arrival order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.lock().calls.clone()
    }

    /// Persisted total for `actor_id`.
    pub fn total_for(&self, actor_id: &str) -> u64 {
        self.lock().totals.get(actor_id).copied().unwrap_or(0)
    }
}

impl Syncer for MemorySyncer {
    async fn sync(&self, actor_id: &str, points: u32) -> Result<(), SyncError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut store = self.lock();
        store.calls.push((actor_id.to_string(), points));
        if let Some(reason) = &self.fail_with {
            return Err(SyncError::Rejected(reason.clone()));
        }
        *store.totals.entry(actor_id.to_string()).or_insert(0) += u64::from(points);
        Ok(())
    }
}

/// Syncer picked from configuration at runtime.
#[derive(Debug, Clone)]
pub enum ConfiguredSyncer {
    Log(LogSyncer),
    Http(HttpSyncer),
}

impl Syncer for ConfiguredSyncer {
    async fn sync(&self, actor_id: &str, points: u32) -> Result<(), SyncError> {
        match self {
            ConfiguredSyncer::Log(syncer) => syncer.sync(actor_id, points).await,
            ConfiguredSyncer::Http(syncer) => syncer.sync(actor_id, points).await,
        }
    }
}
