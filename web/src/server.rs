use booking_core::AvailabilitySnapshot;
use leptos::prelude::*;
use leptos::server;

/// Loads the current occupancy map from the configured storage backend.
/// Backend failures come back as a `ServerFnError`; the client keeps its
/// last good snapshot and shows a passive indicator instead of clearing
/// anything.
#[server]
pub async fn fetch_slots() -> Result<AvailabilitySnapshot, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        match crate::storage::backend().fetch_snapshot().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => Err(ServerFnError::new(format!("Failed to sync agenda: {}", e))),
        }
    }
    #[cfg(not(feature = "ssr"))]
    {
        Ok(AvailabilitySnapshot::new())
    }
}

/// Pushes the full occupancy map through the storage backend. All-or-nothing
/// at this granularity; on failure the caller's optimistic local state stays
/// as-is and the user can retry.
#[server]
pub async fn save_slots(snapshot: AvailabilitySnapshot) -> Result<(), ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        match crate::storage::backend().persist(&snapshot).await {
            Ok(()) => Ok(()),
            Err(e) => Err(ServerFnError::new(format!(
                "Failed to persist agenda: {}",
                e
            ))),
        }
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = snapshot;
        Ok(())
    }
}
