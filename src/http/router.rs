use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analytics::AnalyticsService;
use crate::cache::MemoryCache;
use crate::store::SqliteBetStore;

use super::handlers;

/// Concrete service type served over HTTP.
pub type Analytics = AnalyticsService<SqliteBetStore, MemoryCache>;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<Analytics>,
}

impl AppState {
    pub fn new(analytics: Analytics) -> Self {
        Self {
            analytics: Arc::new(analytics),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let analytics_routes = Router::new()
        .route("/total_bets", get(handlers::total_bets))
        .route("/total_winnings", get(handlers::total_winnings))
        .route("/top_users", get(handlers::top_users))
        .route("/anomalies", get(handlers::anomalies));

    Router::new()
        .nest("/api/v1/analytics", analytics_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
