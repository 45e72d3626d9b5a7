use async_trait::async_trait;
use booking_core::{AvailabilitySnapshot, SyncBackend, SyncError};
use std::sync::RwLock;

/// In-process system of record. The default backend for local development
/// and the test suite; occupancy lives only as long as the server does.
pub struct MemoryBackend {
    state: RwLock<AvailabilitySnapshot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            state: RwLock::new(AvailabilitySnapshot::new()),
        }
    }

    pub fn with_snapshot(snapshot: AvailabilitySnapshot) -> Self {
        MemoryBackend {
            state: RwLock::new(snapshot),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncBackend for MemoryBackend {
    async fn fetch_snapshot(&self) -> Result<AvailabilitySnapshot, SyncError> {
        self.state
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SyncError::BackendUnavailable("memory store poisoned".to_string()))
    }

    async fn persist(&self, snapshot: &AvailabilitySnapshot) -> Result<(), SyncError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| SyncError::BackendUnavailable("memory store poisoned".to_string()))?;
        // Whole-map replacement: all-or-nothing at the key-set granularity.
        *guard = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::{ResourceType, SlotKey};

    #[tokio::test]
    async fn persists_and_fetches_whole_snapshots() {
        let backend = MemoryBackend::new();
        let key = SlotKey::parse("2026-01-05-09:00").unwrap();
        let snapshot = AvailabilitySnapshot::new().with_occupied(&[key], ResourceType::Court);

        backend.persist(&snapshot).await.unwrap();
        let fetched = backend.fetch_snapshot().await.unwrap();
        assert!(fetched.is_occupied(&key, ResourceType::Court));
    }
}
