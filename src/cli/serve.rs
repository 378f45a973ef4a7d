//! Handler for the `serve` command.

use tracing::info;

use crate::analytics::AnalyticsService;
use crate::cache::MemoryCache;
use crate::cli::{Cli, ServeArgs};
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::http::{self, AppState};
use crate::store::SqliteBetStore;

/// Execute the serve command.
pub async fn execute(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.init_logging();

    let pool = db::create_pool(&config.database.url, config.database.max_connections)?;
    db::run_migrations(&pool)?;

    let store = SqliteBetStore::new(pool);
    let analytics = AnalyticsService::new(store, MemoryCache::new());
    let state = AppState::new(analytics);

    let addr = config.server.addr()?;
    info!(database = %config.database.url, "serving analytics API");

    http::serve(addr, state).await
}
