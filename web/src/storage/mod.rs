#[cfg(feature = "ssr")]
pub mod cached;
#[cfg(feature = "ssr")]
pub mod http;
#[cfg(feature = "ssr")]
pub mod memory;

#[cfg(feature = "ssr")]
use booking_core::SyncBackend;
#[cfg(feature = "ssr")]
use std::sync::{Arc, OnceLock};
#[cfg(feature = "ssr")]
use thiserror::Error;

#[cfg(feature = "ssr")]
static BACKEND: OnceLock<Arc<dyn SyncBackend>> = OnceLock::new();

#[cfg(feature = "ssr")]
#[derive(Debug, Error)]
pub enum InitError {
    #[error("unknown agenda backend `{0}` (expected `memory` or `http`)")]
    UnknownBackend(String),
    #[error("ARENA_SYNC_URL must be set for the http backend")]
    MissingUrl,
    #[error("agenda backend already initialized")]
    AlreadyInitialized,
}

/// Selects the storage backend from the environment and installs it for the
/// lifetime of the process. Every concrete backend is wrapped in
/// [`cached::CachedBackend`] so a flaky remote degrades to the last good
/// snapshot instead of an empty calendar.
///
/// - `ARENA_SYNC_BACKEND`: `memory` (default) or `http`
/// - `ARENA_SYNC_URL`: JSON endpoint for the `http` backend
/// - `ARENA_SYNC_TOKEN`: optional bearer token held by the http adapter
#[cfg(feature = "ssr")]
pub async fn init_backend() -> Result<(), InitError> {
    let kind = std::env::var("ARENA_SYNC_BACKEND").unwrap_or_else(|_| "memory".to_string());
    let inner: Box<dyn SyncBackend> = match kind.as_str() {
        "memory" => Box::new(memory::MemoryBackend::new()),
        "http" => {
            let url = std::env::var("ARENA_SYNC_URL").map_err(|_| InitError::MissingUrl)?;
            let token = std::env::var("ARENA_SYNC_TOKEN").ok();
            Box::new(http::HttpBackend::new(url, token))
        }
        other => return Err(InitError::UnknownBackend(other.to_string())),
    };
    tracing::info!(backend = %kind, "agenda storage backend selected");

    BACKEND
        .set(Arc::new(cached::CachedBackend::new(inner)))
        .map_err(|_| InitError::AlreadyInitialized)
}

#[cfg(feature = "ssr")]
pub fn backend() -> &'static Arc<dyn SyncBackend> {
    BACKEND
        .get()
        .expect("Agenda backend not initialized. Call init_backend() first.")
}
