//! Ephemeral typed cache with per-entry expiration.
//!
//! Everything in the cache is derived from the record store and disposable:
//! an entry may vanish at any time without affecting correctness, only
//! latency. Callers treat any [`CacheError`] as a miss and fall back to the
//! store; cache errors never cross into the crate-level error type.

mod memory;

pub use memory::MemoryCache;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Why a cache operation produced no usable value.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No live entry under the key (absent or expired).
    #[error("no value cached under key {key}")]
    Missing { key: String },

    /// An entry exists but its payload does not decode as the requested
    /// type.
    #[error("failed to decode cached value: {0}")]
    Decode(#[source] serde_json::Error),

    /// The value could not be encoded for storage.
    #[error("failed to encode value for cache: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Typed key-value store with caller-specified time-to-live.
pub trait Cache: Send + Sync {
    /// Fetch the value under `key`, decoded as `T`.
    ///
    /// # Errors
    /// [`CacheError::Missing`] when no live entry exists,
    /// [`CacheError::Decode`] when the stored payload is not a `T`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T>;

    /// Store `value` under `key`, overwriting any existing entry and
    /// resetting its expiration.
    fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()>;
}
