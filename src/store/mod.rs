//! Persistence layer for bet records and aggregate queries.

mod sqlite;

pub use sqlite::SqliteBetStore;

use std::future::Future;

use rust_decimal::Decimal;

use crate::domain::{Bet, UserActivity};
use crate::error::Result;

/// Storage operations for bet records.
///
/// Aggregates reflect the stored population at the moment of the query.
/// Callers that can tolerate bounded staleness should go through
/// [`crate::analytics::AnalyticsService`] instead of hitting the store
/// directly. No operation retries; failures surface to the caller.
pub trait BetStore: Send + Sync {
    /// Insert a batch of bets. A constraint violation anywhere in the batch
    /// persists nothing.
    fn insert(&self, records: &[Bet]) -> impl Future<Output = Result<()>> + Send;

    /// Number of bets placed by a user. Zero for unknown users.
    fn count_bets(&self, user_id: &str) -> impl Future<Output = Result<i64>> + Send;

    /// Sum of stake amounts across a user's winning bets. Zero for none.
    fn sum_winnings(&self, user_id: &str) -> impl Future<Output = Result<Decimal>> + Send;

    /// Users with the highest bet counts, descending, at most `limit`
    /// entries. Ties break on ascending user id so a fixed snapshot always
    /// yields the same order.
    fn top_users(&self, limit: i64) -> impl Future<Output = Result<Vec<UserActivity>>> + Send;

    /// Users whose bet count exceeds 2.5x the population mean, descending.
    /// Empty when there are no users at all.
    fn anomalous_users(&self) -> impl Future<Output = Result<Vec<UserActivity>>> + Send;
}
