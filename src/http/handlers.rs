use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analytics::TOP_USERS_LIMIT;
use crate::domain::UserActivity;

use super::error::ApiError;
use super::router::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    user_id: String,
}

#[derive(Debug, Serialize)]
struct UserBets {
    id: String,
    total_bets: i64,
}

#[derive(Debug, Serialize)]
struct UserWinnings {
    id: String,
    winnings: Decimal,
}

/// Response shape shared by the leaderboard and anomaly endpoints.
#[derive(Debug, Serialize)]
struct UserSummary {
    id: String,
    total_bets: i64,
}

impl From<UserActivity> for UserSummary {
    fn from(user: UserActivity) -> Self {
        Self {
            id: user.user_id,
            total_bets: user.total_bets,
        }
    }
}

fn envelope<T: Serialize>(result: T) -> Json<Value> {
    Json(json!({ "result": result }))
}

fn require_user_id(params: &UserQuery) -> Result<&str, ApiError> {
    if params.user_id.is_empty() {
        return Err(ApiError::missing_param("user_id"));
    }
    Ok(&params.user_id)
}

pub async fn total_bets(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user_id(&params)?;
    let total_bets = state.analytics.total_bets(user_id).await?;

    Ok(envelope(UserBets {
        id: user_id.to_string(),
        total_bets,
    }))
}

pub async fn total_winnings(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user_id(&params)?;
    let winnings = state.analytics.total_winnings(user_id).await?;

    Ok(envelope(UserWinnings {
        id: user_id.to_string(),
        winnings,
    }))
}

pub async fn top_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.analytics.top_users(TOP_USERS_LIMIT).await?;
    let users: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();

    Ok(envelope(users))
}

pub async fn anomalies(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.analytics.anomalous_users().await?;
    let users: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();

    Ok(envelope(users))
}
