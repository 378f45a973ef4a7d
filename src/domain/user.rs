//! Derived per-user projections.

use serde::{Deserialize, Serialize};

/// A user's betting volume, as returned by the leaderboard and anomaly
/// queries. Always a projection over the stored bet population for one
/// user, never stored itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: String,
    pub total_bets: i64,
}
