//! In-process cache backed by a read-write locked map.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::{Cache, CacheError, CacheResult};

struct Entry {
    payload: String,
    expires_at: Instant,
}

/// In-process key-value cache with lazy expiration.
///
/// Payloads are JSON-encoded, so values cross the same serialization
/// boundary they would against an external cache service: a payload written
/// as one shape and read back as another surfaces as [`CacheError::Decode`].
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    return serde_json::from_str(&entry.payload).map_err(CacheError::Decode);
                }
                Some(_) => {}
                None => {
                    return Err(CacheError::Missing {
                        key: key.to_string(),
                    })
                }
            }
        }

        // Expired: remove it so the map does not accumulate dead entries.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }

        Err(CacheError::Missing {
            key: key.to_string(),
        })
    }

    fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()> {
        let payload = serde_json::to_string(value).map_err(CacheError::Encode)?;
        let entry = Entry {
            payload,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }
}
