//! Fetch orchestration and rate-limit handling
//!
//! This module owns the match-data fetch pipeline: burst-capped concurrency,
//! per-match retry loops, batch fan-out, and the session state machine.
//!
//! # Overview
//!
//! 1. **Burst Control**: [`burst::BurstLimiter`] bounds in-flight requests
//! 2. **Per-Match Retries**: [`fetch::MatchFetcher`] classifies each attempt
//!    into success, local retry, or escalation
//! 3. **Batch Fan-Out**: [`batch::BatchFetcher`] runs one round concurrently
//!    and partitions the outcomes
//! 4. **Session Driving**: [`session::MatchHistorySession`] loops rounds
//!    until every ID is fetched or abandoned
//! 5. **Progress**: [`progress::FetchProgress`] backs the periodic
//!    `[PROGRESS]` log lines
//!
//! # Quick Start
//!
//! ```no_run
//! use riot_match_downloader::api::http::RiotHttpClient;
//! use riot_match_downloader::downloader::{FetchConfig, MatchHistorySession};
//! use riot_match_downloader::region::Region;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(RiotHttpClient::from_env()?);
//! let session = MatchHistorySession::new(api)
//!     .with_config(FetchConfig::default().with_burst_limit(10));
//! let outcome = session.run("Berserk", "KNG0", Region::Na, 40).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Only identity resolution and match-ID listing failures abort a session.
//! Per-match failures are recovered up to their budgets and surface as data
//! in [`session::SessionOutcome::failed`].

pub mod batch;
pub mod burst;
pub mod config;
pub mod fetch;
pub mod progress;
pub mod session;

pub use batch::{BatchFetcher, BatchResult};
pub use burst::{BurstError, BurstLimiter, BurstPermit};
pub use config::FetchConfig;
pub use fetch::{MatchFetchOutcome, MatchFetcher};
pub use progress::FetchProgress;
pub use session::{MatchHistorySession, SessionError, SessionOutcome, SessionState};
