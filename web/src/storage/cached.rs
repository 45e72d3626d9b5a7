use async_trait::async_trait;
use booking_core::{AvailabilitySnapshot, SyncBackend, SyncError};
use std::sync::RwLock;

/// Decorator that remembers the last snapshot the inner backend served and
/// answers with it when a later fetch fails. Offline or flaky remotes thus
/// degrade to read-only browsing of the last-known calendar.
pub struct CachedBackend {
    inner: Box<dyn SyncBackend>,
    last_good: RwLock<Option<AvailabilitySnapshot>>,
}

impl CachedBackend {
    pub fn new(inner: Box<dyn SyncBackend>) -> Self {
        CachedBackend {
            inner,
            last_good: RwLock::new(None),
        }
    }
}

#[async_trait]
impl SyncBackend for CachedBackend {
    async fn fetch_snapshot(&self) -> Result<AvailabilitySnapshot, SyncError> {
        match self.inner.fetch_snapshot().await {
            Ok(snapshot) => {
                if let Ok(mut guard) = self.last_good.write() {
                    *guard = Some(snapshot.clone());
                }
                Ok(snapshot)
            }
            Err(e) => {
                let cached = self
                    .last_good
                    .read()
                    .ok()
                    .and_then(|guard| guard.clone());
                match cached {
                    Some(snapshot) => {
                        tracing::warn!(error = %e, "agenda fetch failed, serving last good snapshot");
                        Ok(snapshot)
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn persist(&self, snapshot: &AvailabilitySnapshot) -> Result<(), SyncError> {
        self.inner.persist(snapshot).await?;
        if let Ok(mut guard) = self.last_good.write() {
            *guard = Some(snapshot.clone());
        }
        Ok(())
    }
}
