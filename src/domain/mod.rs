//! Domain types for bet records and derived aggregates.

mod bet;
mod outcome;
mod user;

pub use bet::{Bet, InvalidBet};
pub use outcome::Outcome;
pub use user::UserActivity;
