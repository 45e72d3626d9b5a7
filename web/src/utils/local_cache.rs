/// Offline convenience cache: the last-synced snapshot as a single JSON
/// blob in `localStorage`, used for read-only browsing when a fetch fails.
use booking_core::AvailabilitySnapshot;

pub const CACHE_KEY: &str = "arena-agenda-snapshot";

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
pub fn save(snapshot: &AvailabilitySnapshot) {
    let Some(storage) = local_storage() else {
        return;
    };
    if let Ok(json) = serde_json::to_string(snapshot) {
        let _ = storage.set_item(CACHE_KEY, &json);
    }
}

#[cfg(feature = "hydrate")]
pub fn load() -> Option<AvailabilitySnapshot> {
    let storage = local_storage()?;
    let json = storage.get_item(CACHE_KEY).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

#[cfg(not(feature = "hydrate"))]
pub fn save(_snapshot: &AvailabilitySnapshot) {}

#[cfg(not(feature = "hydrate"))]
pub fn load() -> Option<AvailabilitySnapshot> {
    None
}
