//! Persisted key-value client storage for the shop engine.
//!
//! Mirrors a browser profile's local storage: string keys, string values,
//! last-write-wins. The typed [`Cache`] layer adds JSON encoding and the
//! discard-on-malformed policy every store in the engine relies on.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_cache::{Cache, FileStore};
//! use std::sync::Arc;
//!
//! let cache = Cache::new(Arc::new(FileStore::open("profile/storage.json")?));
//!
//! // Store a value
//! cache.set("wishlist", &vec!["cHJvZHVjdDox"])?;
//!
//! // Corrupt or missing values come back as `None`
//! let ids: Option<Vec<String>> = cache.load("wishlist");
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
