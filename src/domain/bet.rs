//! The bet record and its invariants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Outcome;

/// A single bet record. Immutable once stored; created by ingestion, never
/// updated or deleted.
///
/// The serialized form matches the bulk-load file format: one JSON object
/// per line with fields `bet_id`, `user_id`, `amount`, `odds`, `outcome`,
/// `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub bet_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub odds: Decimal,
    pub outcome: Outcome,
    #[serde(rename = "timestamp")]
    pub placed_at: DateTime<Utc>,
}

/// Violations of bet invariants, caught before a record reaches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBet {
    #[error("bet_id cannot be empty")]
    EmptyBetId,

    #[error("user_id cannot be empty")]
    EmptyUserId,

    #[error("amount must be non-negative, got {amount}")]
    NegativeAmount { amount: Decimal },

    #[error("odds must be positive, got {odds}")]
    NonPositiveOdds { odds: Decimal },
}

impl Bet {
    /// Check the record invariants: identifiers present, amount >= 0,
    /// odds > 0.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), InvalidBet> {
        if self.bet_id.is_empty() {
            return Err(InvalidBet::EmptyBetId);
        }
        if self.user_id.is_empty() {
            return Err(InvalidBet::EmptyUserId);
        }
        if self.amount.is_sign_negative() {
            return Err(InvalidBet::NegativeAmount {
                amount: self.amount,
            });
        }
        if self.odds <= Decimal::ZERO {
            return Err(InvalidBet::NonPositiveOdds { odds: self.odds });
        }
        Ok(())
    }
}
