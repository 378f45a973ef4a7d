//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::bets;

/// Database row for a bet. Amounts and timestamps are text-encoded; the
/// store converts to and from domain types at the boundary.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = bets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BetRow {
    pub bet_id: String,
    pub user_id: String,
    pub amount: String,
    pub odds: String,
    pub outcome: String,
    pub placed_at: String,
    pub created: String,
}
