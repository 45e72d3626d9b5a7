pub mod format;
pub mod local_cache;
