//! Fire-and-forget dispatch of score deltas.
//!
//! [`SyncDispatcher::dispatch`] returns immediately; the call to the
//! [`Syncer`] runs on the tokio runtime under a bounded timeout. Failures
//! and timeouts are logged and counted, never propagated back into the
//! caller's action, and the local score is never rolled back.
//!
//! Dropping the dispatcher detaches syncs still in flight; they run to
//! completion on the runtime and log their own outcome.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinSet;

use super::{SyncError, Syncer};

/// How one background sync ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Delivered,
    Failed,
    TimedOut,
}

/// Tally of finished background syncs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub delivered: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Delivered => self.delivered += 1,
            SyncOutcome::Failed => self.failed += 1,
            SyncOutcome::TimedOut => self.timed_out += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.delivered + self.failed + self.timed_out
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.delivered += other.delivered;
        self.failed += other.failed;
        self.timed_out += other.timed_out;
    }
}

/// Runs syncs in the background and keeps track of the ones in flight.
#[derive(Debug)]
pub struct SyncDispatcher<S> {
    syncer: Arc<S>,
    timeout: Duration,
    in_flight: JoinSet<SyncOutcome>,
    finished: SyncReport,
}

impl<S: Syncer> SyncDispatcher<S> {
    pub fn new(syncer: S, timeout: Duration) -> Self {
        Self::with_shared(Arc::new(syncer), timeout)
    }

    pub fn with_shared(syncer: Arc<S>, timeout: Duration) -> Self {
        Self {
            syncer,
            timeout,
            in_flight: JoinSet::new(),
            finished: SyncReport::default(),
        }
    }

    /// Number of syncs spawned but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Start a background sync of `points` for `actor_id`.
    ///
    /// Never blocks. Outside a tokio runtime the delta cannot be sent; that
    /// is logged and counted as a failure.
    pub fn dispatch(&mut self, actor_id: &str, points: u32) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(actor_id, points, "no async runtime, score delta not synced");
            self.finished.record(SyncOutcome::Failed);
            return;
        };

        let syncer = Arc::clone(&self.syncer);
        let actor_id = actor_id.to_string();
        let timeout = self.timeout;

        self.in_flight.spawn_on(
            async move {
                match tokio::time::timeout(timeout, syncer.sync(&actor_id, points)).await {
                    Ok(Ok(())) => {
                        tracing::info!(actor_id = %actor_id, points, "score delta synced");
                        SyncOutcome::Delivered
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            actor_id = %actor_id,
                            points,
                            error = %e,
                            "score sync failed"
                        );
                        SyncOutcome::Failed
                    }
                    Err(_) => {
                        let e = SyncError::Timeout(timeout);
                        tracing::warn!(
                            actor_id = %actor_id,
                            points,
                            error = %e,
                            "score sync dropped"
                        );
                        SyncOutcome::TimedOut
                    }
                }
            },
            &handle,
        );
        self.reap();
    }

    /// Collect syncs that already finished without waiting.
    pub fn reap(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        while let Some(joined) = self.in_flight.try_join_next() {
            report.record(Self::outcome(joined));
        }
        self.finished.merge(report);
        report
    }

    /// Wait for every in-flight sync and return the outcomes collected so far,
    /// including those reaped earlier.
    pub async fn drain(&mut self) -> SyncReport {
        while let Some(joined) = self.in_flight.join_next().await {
            self.finished.record(Self::outcome(joined));
        }
        self.finished
    }

    /// Outcomes collected so far.
    pub fn report(&self) -> SyncReport {
        self.finished
    }

    fn outcome(joined: Result<SyncOutcome, tokio::task::JoinError>) -> SyncOutcome {
        joined.unwrap_or_else(|e| {
            tracing::error!(error = %e, "score sync task aborted");
            SyncOutcome::Failed
        })
    }
}

impl<S> Drop for SyncDispatcher<S> {
    fn drop(&mut self) {
        let pending = self.in_flight.len();
        if pending > 0 {
            tracing::warn!(pending, "dispatcher dropped, detaching in-flight score syncs");
            self.in_flight.detach_all();
        }
    }
}
