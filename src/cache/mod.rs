//! Persistent per-user cache of library locations and versions.
//!
//! See [`store::LibraryCache`] for the on-disk layout.

pub mod store;

pub use store::{CacheError, LibraryCache, CACHE_FILE_NAME};
