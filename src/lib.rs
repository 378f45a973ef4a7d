//! Betlytics - betting analytics over a cache-aside storage layer.
//!
//! The crate ingests bet records in concurrent batches and serves four
//! aggregate queries (per-user bet counts and winnings, a leaderboard, and
//! anomaly detection) through a cache-aside read path: probe the ephemeral
//! cache, fall back to the record store on any miss, repopulate
//! best-effort. Cached reads may be up to one TTL window (60 seconds)
//! stale; store failures always propagate.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Bet records and derived projections
//! - [`error`] - Error types for the crate
//! - [`db`] - Connection pool and embedded migrations
//! - [`store`] - Record store trait and SQLite implementation
//! - [`cache`] - Typed ephemeral cache with per-entry expiration
//! - [`analytics`] - Cache-aside query service
//! - [`ingest`] - Concurrent batch-ingestion pipeline and bulk-load files
//! - [`http`] - Thin HTTP surface over the analytics service
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use betlytics::cache::{Cache, MemoryCache};
//! use std::time::Duration;
//!
//! let cache = MemoryCache::new();
//! cache.set("total-bets-u1", &42_i64, Duration::from_secs(60)).unwrap();
//!
//! let cached: i64 = cache.get("total-bets-u1").unwrap();
//! assert_eq!(cached, 42);
//! ```

pub mod analytics;
pub mod cache;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod http;
pub mod ingest;
pub mod store;
