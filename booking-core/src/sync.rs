use crate::availability::AvailabilitySnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Failures a storage backend may report. Both are recoverable: callers
/// keep the last good snapshot and surface a passive indicator, never a
/// blocking error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("network error talking to the agenda backend: {0}")]
    Network(String),
    #[error("agenda backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Boundary between the booking core and whatever system of record stores
/// occupancy (remote feed, realtime DB, polling endpoint, local cache).
///
/// Contract: `persist` applies the given key set all-or-nothing; a failed
/// `fetch_snapshot` must not clear caller state (fall back to the cached
/// snapshot instead); auth tokens, if a concrete backend needs one, live in
/// that backend, never here.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<AvailabilitySnapshot, SyncError>;

    /// Best-effort write of the full occupancy map. Failure is reported but
    /// does not roll back the optimistic local update already shown in the
    /// UI; the user's in-progress selection stays intact for a retry.
    async fn persist(&self, snapshot: &AvailabilitySnapshot) -> Result<(), SyncError>;
}
