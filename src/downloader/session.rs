//! Session driver: the outer fetch state machine
//!
//! A session resolves the player's identity once, lists match IDs once, then
//! loops batch rounds over the still-pending IDs, sleeping through
//! rolling-window pauses, until every ID is fetched or abandoned.
//!
//! State machine:
//!
//! ```text
//! ResolvingIdentity -> ListingMatches -> Fetching <-> Waiting -> Done
//! ```
//!
//! Identity and listing failures are fatal; everything downstream is
//! recovered internally and reported as data.

use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use crate::api::{ApiError, RiotApi};
use crate::downloader::batch::BatchFetcher;
use crate::downloader::burst::BurstLimiter;
use crate::downloader::config::FetchConfig;
use crate::downloader::fetch::MatchFetcher;
use crate::downloader::progress::FetchProgress;
use crate::metrics::{self, SessionMetrics};
use crate::region::Region;
use crate::shutdown::{self, SharedShutdown};
use crate::{Account, MatchId, MatchRecord};

/// Phase of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Resolving the Riot ID to a puuid
    ResolvingIdentity,
    /// Listing match IDs for the session
    ListingMatches,
    /// Running a concurrent batch round
    Fetching,
    /// Sleeping through an exhausted rolling window
    Waiting,
    /// All IDs fetched or abandoned
    Done,
}

/// Final result of a completed session.
///
/// `matches.len() + failed.len()` equals the number of listed match IDs: no
/// ID is lost or duplicated. A non-empty `failed` list is a smaller result
/// set, not an error.
#[derive(Debug)]
pub struct SessionOutcome {
    /// The resolved account identity
    pub account: Account,
    /// Records accumulated across all rounds, append-only
    pub matches: Vec<MatchRecord>,
    /// IDs abandoned after exhausting their retry budget
    pub failed: Vec<MatchId>,
    /// Number of batch rounds the session ran
    pub rounds: u32,
}

/// Fatal session errors.
///
/// Only these propagate to the caller; per-match failures populate
/// [`SessionOutcome::failed`] instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Identity resolution failed; nothing else can proceed
    #[error("account lookup failed: {0}")]
    AccountLookup(#[source] ApiError),

    /// Match-ID listing failed
    #[error("match listing failed: {0}")]
    MatchListing(#[source] ApiError),

    /// The fetch configuration is unusable
    #[error("invalid fetch configuration: {0}")]
    InvalidConfig(String),

    /// Shutdown was requested while the session was in flight
    #[error("session cancelled by shutdown request")]
    Cancelled,
}

/// Drives one player's match-history fetch from identity resolution to the
/// final accumulated record list.
pub struct MatchHistorySession {
    api: Arc<dyn RiotApi>,
    config: FetchConfig,
    shutdown: Option<SharedShutdown>,
}

impl MatchHistorySession {
    /// Create a session driver with default configuration.
    pub fn new(api: Arc<dyn RiotApi>) -> Self {
        Self {
            api,
            config: FetchConfig::default(),
            shutdown: shutdown::get_global_shutdown(),
        }
    }

    /// Override the fetch configuration.
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a shared shutdown handle for graceful cancellation.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run the session to completion.
    ///
    /// Resolves identity and lists up to `count` ranked match IDs, then
    /// loops batch rounds until the pending set empties or the round cap is
    /// reached. Rolling-window pauses block the whole session; ordinary
    /// retryable errors resubmit immediately (per-attempt pacing already
    /// spaces the requests).
    pub async fn run(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Region,
        count: usize,
    ) -> Result<SessionOutcome, SessionError> {
        let span = tracing::info_span!(
            "match_history_session",
            game_name,
            tag_line,
            region = %region,
            count
        );
        self.run_inner(game_name, tag_line, region, count)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Region,
        count: usize,
    ) -> Result<SessionOutcome, SessionError> {
        self.config
            .validate()
            .map_err(SessionError::InvalidConfig)?;

        let session_metrics =
            SessionMetrics::start(format!("{game_name}#{tag_line}"), region.to_string());

        let mut state = SessionState::ResolvingIdentity;
        info!(?state, "Resolving account identity");
        let account = match self.api.account_by_riot_id(game_name, tag_line).await {
            Ok(account) => account,
            Err(e) => {
                session_metrics.record_fatal(&e.to_string());
                return Err(SessionError::AccountLookup(e));
            }
        };

        state = SessionState::ListingMatches;
        info!(?state, puuid = %account.puuid, "Listing match IDs");
        let listed = match self
            .api
            .match_ids_by_puuid(region, &account.puuid, count)
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                session_metrics.record_fatal(&e.to_string());
                return Err(SessionError::MatchListing(e));
            }
        };
        let total = listed.len();
        info!(total, "Match IDs listed");

        let burst = Arc::new(BurstLimiter::new(self.config.burst_limit));
        let fetcher = MatchFetcher::new(
            self.api.clone(),
            burst,
            self.config.clone(),
            region,
            account.puuid.clone(),
        );
        let batch = BatchFetcher::new(fetcher);

        let mut progress = FetchProgress::new(total as u64);
        let mut matches: Vec<MatchRecord> = Vec::with_capacity(total);
        let mut failed: Vec<MatchId> = Vec::new();
        let mut pending = listed;
        let mut rounds = 0u32;

        while !pending.is_empty() {
            if self.shutdown_requested() {
                return Err(SessionError::Cancelled);
            }

            rounds += 1;
            if rounds > self.config.max_rounds {
                warn!(
                    abandoned = pending.len(),
                    max_rounds = self.config.max_rounds,
                    "Session round cap reached - abandoning remaining match IDs"
                );
                failed.append(&mut pending);
                break;
            }

            state = SessionState::Fetching;
            debug!(?state, round = rounds, pending = pending.len(), "Starting batch round");
            let result = batch.run(&pending).await;

            progress.update(result.succeeded.len() as u64, result.failed.len() as u64);
            matches.extend(result.succeeded);
            failed.extend(result.failed);

            if progress.should_emit_update() {
                info!("{}", progress.format_progress());
                progress.mark_emitted();
            }

            if let Some(wait) = result.long_wait {
                state = SessionState::Waiting;
                let pause = wait + self.config.retry_margin;
                warn!(
                    ?state,
                    pause_secs = pause.as_secs_f64(),
                    resubmitting = result.to_retry.len(),
                    "Rolling rate-limit window exhausted - pausing session"
                );
                metrics::record_long_wait(pause);

                if let Some(shutdown) = &self.shutdown {
                    if !shutdown.sleep_unless_shutdown(pause).await {
                        return Err(SessionError::Cancelled);
                    }
                } else {
                    tokio::time::sleep(pause).await;
                }
            }

            pending = result.to_retry;
        }

        state = SessionState::Done;
        info!(
            ?state,
            fetched = matches.len(),
            failed = failed.len(),
            rounds,
            "Session complete"
        );
        session_metrics.record_complete(matches.len() as u64, failed.len() as u64);

        Ok(SessionOutcome {
            account,
            matches,
            failed,
            rounds,
        })
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|s| s.is_shutdown_requested())
            .unwrap_or(false)
    }
}
