//! Concurrent batch-ingestion pipeline.
//!
//! Incoming records are split into contiguous batches and each batch is
//! persisted by its own task: one bad record fails only its own batch,
//! never a sibling. The pipeline reports every failed range instead of
//! swallowing failures, so the caller decides whether partial success is
//! acceptable. There are no retries and no concurrency ceiling beyond the
//! partitioning itself.

pub mod loader;

use std::ops::Range;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::domain::Bet;
use crate::error::{Error, Result};
use crate::store::BetStore;

/// Maximum number of records persisted as one batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// A batch that failed to persist.
#[derive(Debug)]
pub struct BatchFailure {
    /// Index range of the failed records within the input.
    pub range: Range<usize>,
    pub error: Error,
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Number of batches dispatched.
    pub batches: usize,
    /// Number of batches fully persisted.
    pub succeeded: usize,
    pub failed: Vec<BatchFailure>,
}

impl IngestReport {
    /// True when every dispatched batch persisted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fan-out/fan-in ingestion over a shared record store.
pub struct IngestPipeline<S> {
    store: Arc<S>,
    batch_size: usize,
}

impl<S> IngestPipeline<S>
where
    S: BetStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the batch size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Persist `bets`, one concurrent task per batch, and wait for all of
    /// them.
    ///
    /// A failing batch is recorded in the report and does not abort its
    /// siblings. Cancelling `cancel` skips batches that have not started,
    /// races in-flight ones at their next await point, and makes the call
    /// return [`Error::Canceled`] once every task has settled; batches that
    /// already persisted stay persisted.
    ///
    /// # Errors
    /// Only cancellation produces an `Err`. Per-batch failures are reported
    /// through the [`IngestReport`].
    pub async fn process(&self, bets: Vec<Bet>, cancel: CancellationToken) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        if bets.is_empty() {
            return Ok(report);
        }

        let total = bets.len();
        let bets = Arc::new(bets);
        let mut handles: Vec<(Range<usize>, JoinHandle<Result<()>>)> = Vec::new();

        let mut start = 0;
        while start < total {
            let end = usize::min(start + self.batch_size, total);
            let range = start..end;

            let store = Arc::clone(&self.store);
            let input = Arc::clone(&bets);
            let token = cancel.clone();
            let batch = range.clone();

            let handle = tokio::spawn(async move {
                if token.is_cancelled() {
                    return Err(Error::Canceled);
                }
                tokio::select! {
                    () = token.cancelled() => Err(Error::Canceled),
                    result = store.insert(&input[batch]) => result,
                }
            });

            report.batches += 1;
            handles.push((range, handle));
            start = end;
        }

        for (range, handle) in handles {
            match handle.await {
                Ok(Ok(())) => report.succeeded += 1,
                Ok(Err(err)) => {
                    error!(
                        start = range.start,
                        end = range.end,
                        error = %err,
                        "batch failed"
                    );
                    report.failed.push(BatchFailure { range, error: err });
                }
                Err(join_err) => {
                    error!(
                        start = range.start,
                        end = range.end,
                        error = %join_err,
                        "batch task did not complete"
                    );
                    report.failed.push(BatchFailure {
                        range,
                        error: Error::Database(join_err.to_string()),
                    });
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        info!(
            batches = report.batches,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "ingestion finished"
        );

        Ok(report)
    }
}
