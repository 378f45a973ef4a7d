//! SQLite store implementation using Diesel.

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::BetStore;
use crate::db::model::BetRow;
use crate::db::schema::bets;
use crate::db::DbPool;
use crate::domain::{Bet, Outcome, UserActivity};
use crate::error::{Error, Result};

/// Anomaly threshold as the ratio 25/10 (2.5x the mean), kept in integers
/// so the comparison is exact for any snapshot.
const ANOMALY_RATIO_NUM: i64 = 25;
const ANOMALY_RATIO_DEN: i64 = 10;

/// SQLite-backed bet store.
pub struct SqliteBetStore {
    pool: DbPool,
}

impl SqliteBetStore {
    /// Create a new SQLite bet store.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(bet: &Bet) -> BetRow {
        BetRow {
            bet_id: bet.bet_id.clone(),
            user_id: bet.user_id.clone(),
            amount: bet.amount.to_string(),
            odds: bet.odds.to_string(),
            outcome: bet.outcome.as_str().to_string(),
            placed_at: bet.placed_at.to_rfc3339(),
            created: Utc::now().to_rfc3339(),
        }
    }
}

fn map_insert_error(err: diesel::result::Error) -> Error {
    match err {
        diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation,
            info,
        ) => Error::Constraint(info.message().to_string()),
        other => Error::Database(other.to_string()),
    }
}

impl BetStore for SqliteBetStore {
    async fn insert(&self, records: &[Bet]) -> Result<()> {
        for bet in records {
            bet.validate()
                .map_err(|e| Error::Constraint(format!("bet {:?}: {e}", bet.bet_id)))?;
        }

        let rows: Vec<BetRow> = records.iter().map(Self::to_row).collect();
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(bets::table)
            .values(&rows)
            .execute(&mut conn)
            .map_err(map_insert_error)?;

        Ok(())
    }

    async fn count_bets(&self, user_id: &str) -> Result<i64> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        bets::table
            .filter(bets::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn sum_winnings(&self, user_id: &str) -> Result<Decimal> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        // Amounts are stored as decimal text; summing happens in Decimal
        // space, never floating point.
        let amounts: Vec<String> = bets::table
            .filter(bets::user_id.eq(user_id))
            .filter(bets::outcome.eq(Outcome::Win.as_str()))
            .select(bets::amount)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut total = Decimal::ZERO;
        for amount in &amounts {
            total += Decimal::from_str(amount).map_err(|e| Error::Parse(e.to_string()))?;
        }

        Ok(total)
    }

    async fn top_users(&self, limit: i64) -> Result<Vec<UserActivity>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let grouped: Vec<(String, i64)> = bets::table
            .group_by(bets::user_id)
            .select((bets::user_id, count_star()))
            .order((count_star().desc(), bets::user_id.asc()))
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(grouped
            .into_iter()
            .map(|(user_id, total_bets)| UserActivity {
                user_id,
                total_bets,
            })
            .collect())
    }

    async fn anomalous_users(&self) -> Result<Vec<UserActivity>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let grouped: Vec<(String, i64)> = bets::table
            .group_by(bets::user_id)
            .select((bets::user_id, count_star()))
            .order((count_star().desc(), bets::user_id.asc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let users = grouped.len() as i64;
        if users == 0 {
            return Ok(Vec::new());
        }
        let rows: i64 = grouped.iter().map(|(_, count)| count).sum();

        // count > 2.5 * rows / users, cross-multiplied to stay in integers
        Ok(grouped
            .into_iter()
            .filter(|(_, count)| count * users * ANOMALY_RATIO_DEN > rows * ANOMALY_RATIO_NUM)
            .map(|(user_id, total_bets)| UserActivity {
                user_id,
                total_bets,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use rust_decimal_macros::dec;

    fn setup_test_store() -> SqliteBetStore {
        // A single-connection pool keeps every query on the same in-memory
        // database.
        let pool = create_pool(":memory:", 1).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        SqliteBetStore::new(pool)
    }

    fn bet(id: &str, user: &str, amount: Decimal, outcome: Outcome) -> Bet {
        Bet {
            bet_id: id.to_string(),
            user_id: user.to_string(),
            amount,
            odds: dec!(1.85),
            outcome,
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unknown_user_has_zero_totals() {
        let store = setup_test_store();

        assert_eq!(store.count_bets("nobody").await.unwrap(), 0);
        assert_eq!(store.sum_winnings("nobody").await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn winnings_only_count_wins() {
        let store = setup_test_store();

        store
            .insert(&[bet("b1", "u1", dec!(100), Outcome::Win)])
            .await
            .unwrap();
        assert_eq!(store.sum_winnings("u1").await.unwrap(), dec!(100));

        store
            .insert(&[bet("b2", "u1", dec!(50), Outcome::Lose)])
            .await
            .unwrap();
        assert_eq!(store.sum_winnings("u1").await.unwrap(), dec!(100));
        assert_eq!(store.count_bets("u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn winnings_sum_is_exact_decimal() {
        let store = setup_test_store();

        store
            .insert(&[
                bet("b1", "u1", dec!(0.10), Outcome::Win),
                bet("b2", "u1", dec!(0.20), Outcome::Win),
            ])
            .await
            .unwrap();

        assert_eq!(store.sum_winnings("u1").await.unwrap(), dec!(0.30));
    }

    #[tokio::test]
    async fn duplicate_id_fails_whole_batch() {
        let store = setup_test_store();

        store
            .insert(&[bet("b1", "u1", dec!(10), Outcome::Win)])
            .await
            .unwrap();

        let result = store
            .insert(&[
                bet("b2", "u1", dec!(10), Outcome::Win),
                bet("b1", "u1", dec!(10), Outcome::Win),
                bet("b3", "u1", dec!(10), Outcome::Win),
            ])
            .await;

        assert!(matches!(result, Err(Error::Constraint(_))));
        // Nothing from the failed batch persisted.
        assert_eq!(store.count_bets("u1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_record_rejected_before_storage() {
        let store = setup_test_store();

        let result = store
            .insert(&[bet("b1", "u1", dec!(-5), Outcome::Win)])
            .await;

        assert!(matches!(result, Err(Error::Constraint(_))));
        assert_eq!(store.count_bets("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn top_users_orders_and_truncates() {
        let store = setup_test_store();

        let mut records = Vec::new();
        for i in 0..3 {
            records.push(bet(&format!("a{i}"), "alice", dec!(10), Outcome::Win));
        }
        for i in 0..2 {
            records.push(bet(&format!("b{i}"), "bob", dec!(10), Outcome::Lose));
        }
        records.push(bet("c0", "carol", dec!(10), Outcome::Win));
        store.insert(&records).await.unwrap();

        let top = store.top_users(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, "alice");
        assert_eq!(top[0].total_bets, 3);
        assert_eq!(top[1].user_id, "bob");

        // Stable under repeated calls against unchanged data.
        assert_eq!(store.top_users(2).await.unwrap(), top);
    }

    #[tokio::test]
    async fn top_users_ties_break_on_user_id() {
        let store = setup_test_store();

        store
            .insert(&[
                bet("b1", "zed", dec!(10), Outcome::Win),
                bet("b2", "amy", dec!(10), Outcome::Win),
            ])
            .await
            .unwrap();

        let top = store.top_users(5).await.unwrap();
        assert_eq!(top[0].user_id, "amy");
        assert_eq!(top[1].user_id, "zed");
    }

    #[tokio::test]
    async fn anomalous_users_empty_without_data() {
        let store = setup_test_store();
        assert!(store.anomalous_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anomalous_users_empty_when_counts_are_uniform() {
        let store = setup_test_store();

        let mut records = Vec::new();
        for user in ["u1", "u2", "u3"] {
            for i in 0..4 {
                records.push(bet(&format!("{user}-{i}"), user, dec!(5), Outcome::Lose));
            }
        }
        store.insert(&records).await.unwrap();

        assert!(store.anomalous_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anomalous_users_flags_heavy_bettor() {
        let store = setup_test_store();

        // Nine users with one bet each, one user with twelve: mean is 21/10,
        // threshold 5.25, so only the heavy user qualifies.
        let mut records = Vec::new();
        for i in 0..9 {
            records.push(bet(&format!("s{i}"), &format!("small{i}"), dec!(5), Outcome::Lose));
        }
        for i in 0..12 {
            records.push(bet(&format!("h{i}"), "whale", dec!(5), Outcome::Win));
        }
        store.insert(&records).await.unwrap();

        let anomalous = store.anomalous_users().await.unwrap();
        assert_eq!(anomalous.len(), 1);
        assert_eq!(anomalous[0].user_id, "whale");
        assert_eq!(anomalous[0].total_bets, 12);
    }
}
