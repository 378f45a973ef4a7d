//! Cache-aside query service over the record store.
//!
//! Every aggregate query follows the same protocol: derive a key from the
//! query name and all of its parameters, probe the cache, and on any miss
//! (absent key or undecodable payload) fall back to the record store,
//! repopulating the cache best-effort. A hit may be up to [`CACHE_TTL`]
//! stale; a store error after a miss always propagates - no stale value is
//! ever served in its place.
//!
//! Concurrent identical queries are not deduplicated: two simultaneous
//! misses both hit the store and both write the cache. The fallback is
//! idempotent, so this costs latency, never correctness.

use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::domain::UserActivity;
use crate::error::Result;
use crate::store::BetStore;

/// How stale a cached aggregate may be.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

/// Number of entries served by the leaderboard endpoint.
pub const TOP_USERS_LIMIT: i64 = 5;

/// Serves the four aggregate queries through the cache-aside protocol.
///
/// The store and cache are injected; the service owns no global state and
/// spawns no tasks of its own.
pub struct AnalyticsService<S, C> {
    store: S,
    cache: C,
}

impl<S, C> AnalyticsService<S, C>
where
    S: BetStore,
    C: Cache,
{
    pub fn new(store: S, cache: C) -> Self {
        Self { store, cache }
    }

    /// Total number of bets a user has placed.
    pub async fn total_bets(&self, user_id: &str) -> Result<i64> {
        let key = format!("total-bets-{user_id}");
        if let Ok(cached) = self.cache.get::<i64>(&key) {
            return Ok(cached);
        }

        let total = self.store.count_bets(user_id).await?;
        self.populate(&key, &total);

        Ok(total)
    }

    /// Sum of stake amounts across a user's winning bets.
    pub async fn total_winnings(&self, user_id: &str) -> Result<Decimal> {
        let key = format!("total-winnings-{user_id}");
        if let Ok(cached) = self.cache.get::<Decimal>(&key) {
            return Ok(cached);
        }

        let total = self.store.sum_winnings(user_id).await?;
        self.populate(&key, &total);

        Ok(total)
    }

    /// Users with the highest bet counts, at most `limit` entries.
    ///
    /// The key carries the limit: results cached for one limit are never
    /// served for another.
    pub async fn top_users(&self, limit: i64) -> Result<Vec<UserActivity>> {
        let key = format!("top-users-{limit}");
        if let Ok(cached) = self.cache.get::<Vec<UserActivity>>(&key) {
            return Ok(cached);
        }

        let users = self.store.top_users(limit).await?;
        self.populate(&key, &users);

        Ok(users)
    }

    /// Users whose bet count exceeds 2.5x the population mean.
    pub async fn anomalous_users(&self) -> Result<Vec<UserActivity>> {
        let key = "anomalous-users";
        if let Ok(cached) = self.cache.get::<Vec<UserActivity>>(key) {
            return Ok(cached);
        }

        let users = self.store.anomalous_users().await?;
        self.populate(key, &users);

        Ok(users)
    }

    /// Best-effort cache write: the cache is strictly an optimization, so
    /// a failure degrades freshness of later reads, never this query.
    fn populate<T: Serialize>(&self, key: &str, value: &T) {
        match self.cache.set(key, value, CACHE_TTL) {
            Ok(()) => debug!(key, "cache populated"),
            Err(error) => warn!(key, %error, "failed to populate cache"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, MemoryCache};
    use crate::domain::Bet;
    use crate::error::Error;
    use rust_decimal_macros::dec;
    use serde::de::DeserializeOwned;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Store stub that counts how often each query reaches it.
    #[derive(Default)]
    struct CountingStore {
        calls: Arc<AtomicUsize>,
    }

    impl BetStore for CountingStore {
        async fn insert(&self, _records: &[Bet]) -> Result<()> {
            Ok(())
        }

        async fn count_bets(&self, _user_id: &str) -> Result<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        }

        async fn sum_winnings(&self, _user_id: &str) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(dec!(42.50))
        }

        async fn top_users(&self, limit: i64) -> Result<Vec<UserActivity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..limit)
                .map(|i| UserActivity {
                    user_id: format!("u{i}"),
                    total_bets: limit - i,
                })
                .collect())
        }

        async fn anomalous_users(&self) -> Result<Vec<UserActivity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![UserActivity {
                user_id: "whale".into(),
                total_bets: 99,
            }])
        }
    }

    /// Store stub whose every query fails.
    struct FailingStore;

    impl BetStore for FailingStore {
        async fn insert(&self, _records: &[Bet]) -> Result<()> {
            Err(Error::Database("insert unavailable".into()))
        }

        async fn count_bets(&self, _user_id: &str) -> Result<i64> {
            Err(Error::Database("store unavailable".into()))
        }

        async fn sum_winnings(&self, _user_id: &str) -> Result<Decimal> {
            Err(Error::Database("store unavailable".into()))
        }

        async fn top_users(&self, _limit: i64) -> Result<Vec<UserActivity>> {
            Err(Error::Database("store unavailable".into()))
        }

        async fn anomalous_users(&self) -> Result<Vec<UserActivity>> {
            Err(Error::Database("store unavailable".into()))
        }
    }

    /// Cache stub that rejects every operation.
    struct BrokenCache;

    impl Cache for BrokenCache {
        fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
            Err(CacheError::Missing {
                key: key.to_string(),
            })
        }

        fn set<T: Serialize>(&self, _key: &str, value: &T, _ttl: Duration) -> CacheResult<()> {
            // Force an encode failure without a custom error variant.
            let _ = value;
            Err(CacheError::Missing {
                key: "write rejected".to_string(),
            })
        }
    }

    fn counting_service() -> (Arc<AtomicUsize>, AnalyticsService<CountingStore, MemoryCache>) {
        let store = CountingStore::default();
        let calls = Arc::clone(&store.calls);
        (calls, AnalyticsService::new(store, MemoryCache::new()))
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let (calls, service) = counting_service();

        let first = service.total_bets("u1").await.unwrap();
        let second = service.total_bets("u1").await.unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_entry_falls_back_to_store() {
        let (calls, service) = counting_service();

        // Seed the exact key with a payload of the wrong shape.
        service
            .cache
            .set("total-bets-u1", &"garbage", CACHE_TTL)
            .unwrap();

        assert_eq!(service.total_bets("u1").await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The bad entry was replaced; the next read is a hit.
        assert_eq!(service.total_bets("u1").await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_error_propagates_after_miss() {
        let service = AnalyticsService::new(FailingStore, MemoryCache::new());

        let result = service.total_winnings("u1").await;
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn cache_write_failure_does_not_fail_query() {
        let store = CountingStore::default();
        let calls = Arc::clone(&store.calls);
        let service = AnalyticsService::new(store, BrokenCache);

        assert_eq!(service.total_bets("u1").await.unwrap(), 7);
        // With no working cache, every read reaches the store.
        assert_eq!(service.total_bets("u1").await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_limits_use_distinct_cache_entries() {
        let (calls, service) = counting_service();

        let two = service.top_users(2).await.unwrap();
        let three = service.top_users(3).await.unwrap();

        assert_eq!(two.len(), 2);
        assert_eq!(three.len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Both entries now live side by side.
        assert_eq!(service.top_users(2).await.unwrap().len(), 2);
        assert_eq!(service.top_users(3).await.unwrap().len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn per_user_keys_do_not_collide() {
        let (calls, service) = counting_service();

        service.total_bets("u1").await.unwrap();
        service.total_winnings("u1").await.unwrap();
        service.anomalous_users().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
