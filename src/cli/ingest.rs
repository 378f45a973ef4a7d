//! Handler for the `ingest` command.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{Cli, IngestArgs};
use crate::config::Config;
use crate::db;
use crate::error::{Error, Result};
use crate::ingest::{loader, IngestPipeline};
use crate::store::SqliteBetStore;

/// Execute the ingest command.
pub async fn execute(cli: &Cli, args: &IngestArgs) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    config.init_logging();

    let bets = loader::load_bets(&args.file)?;
    info!(
        records = bets.len(),
        file = %args.file.display(),
        "loaded bet records"
    );

    let pool = db::create_pool(&config.database.url, config.database.max_connections)?;
    db::run_migrations(&pool)?;

    let pipeline = IngestPipeline::new(Arc::new(SqliteBetStore::new(pool)));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("cancellation requested");
                cancel.cancel();
            }
        });
    }

    let report = pipeline.process(bets, cancel).await?;

    if !report.is_complete() {
        return Err(Error::Ingest {
            failed: report.failed.len(),
            batches: report.batches,
        });
    }

    println!("Processed {} batches successfully", report.batches);
    Ok(())
}
