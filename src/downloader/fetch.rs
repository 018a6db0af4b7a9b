//! Per-match fetch loop
//!
//! One [`MatchFetcher::fetch_one`] call owns the full attempt sequence for a
//! single match ID: burst permit, paced attempts, local retries for short
//! rate-limit waits, and escalation of long waits to the batch layer.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::api::{FetchOutcome, RiotApi};
use crate::downloader::burst::BurstLimiter;
use crate::downloader::config::FetchConfig;
use crate::metrics;
use crate::region::Region;
use crate::{MatchId, MatchRecord};

/// Outcome of one full attempt sequence for a match ID.
#[derive(Debug)]
pub enum MatchFetchOutcome {
    /// The record was fetched and the player's slice merged in
    Fetched(Box<MatchRecord>),
    /// The rolling window is exhausted; the whole batch should pause this long
    LongWait(Duration),
    /// The attempt budget is spent (or the payload is unusable); the ID is
    /// abandoned for this round
    Failed {
        /// The ID that failed
        match_id: MatchId,
        /// Human-readable cause of the final attempt
        reason: String,
    },
}

/// Retry loop for single match-detail fetches.
///
/// Holds no mutable state; each `fetch_one` invocation owns its own attempt
/// loop and outcome. The only shared resource is the burst permit pool.
pub struct MatchFetcher {
    api: Arc<dyn RiotApi>,
    burst: Arc<BurstLimiter>,
    config: FetchConfig,
    region: Region,
    puuid: String,
}

impl MatchFetcher {
    /// Create a fetcher bound to one player's session.
    pub fn new(
        api: Arc<dyn RiotApi>,
        burst: Arc<BurstLimiter>,
        config: FetchConfig,
        region: Region,
        puuid: impl Into<String>,
    ) -> Self {
        Self {
            api,
            burst,
            config,
            region,
            puuid: puuid.into(),
        }
    }

    /// Fetch one match, retrying up to the configured attempt budget.
    ///
    /// The burst permit is held across the whole attempt sequence and
    /// released unconditionally when this call returns. A rate-limit wait
    /// above the long-wait threshold escalates immediately: the window is a
    /// client-wide resource, so sibling fetches are about to hit it too.
    pub async fn fetch_one(&self, match_id: MatchId) -> MatchFetchOutcome {
        let _permit = match self.burst.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                return MatchFetchOutcome::Failed {
                    match_id,
                    reason: e.to_string(),
                }
            }
        };

        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            // Fixed pacing before every attempt, independent of outcome.
            sleep(self.config.inter_request_delay).await;

            match self.api.match_by_id(self.region, &match_id).await {
                FetchOutcome::Success(raw) => {
                    debug!(%match_id, attempt, "Match fetched");
                    return match MatchRecord::from_raw(*raw, &self.puuid) {
                        Some(record) => MatchFetchOutcome::Fetched(Box::new(record)),
                        None => MatchFetchOutcome::Failed {
                            match_id,
                            reason: "requesting player absent from participant list".to_string(),
                        },
                    };
                }
                FetchOutcome::RateLimited { wait } => {
                    if wait > self.config.long_wait_threshold {
                        debug!(
                            %match_id,
                            wait_secs = wait.as_secs_f64(),
                            "Long rate-limit wait - escalating to batch"
                        );
                        return MatchFetchOutcome::LongWait(wait);
                    }

                    if attempt < max_attempts {
                        let pause = wait + self.config.retry_margin;
                        warn!(
                            %match_id,
                            attempt,
                            max_attempts,
                            pause_secs = pause.as_secs_f64(),
                            "Rate limit hit - retrying after short wait"
                        );
                        metrics::record_rate_limit_wait(pause, attempt);
                        sleep(pause).await;
                    } else {
                        return MatchFetchOutcome::Failed {
                            match_id,
                            reason: format!("rate limited on all {max_attempts} attempts"),
                        };
                    }
                }
                FetchOutcome::RetryableError(cause) => {
                    if attempt < max_attempts {
                        debug!(%match_id, attempt, %cause, "Retryable fetch error");
                        metrics::record_retry(attempt);
                    } else {
                        return MatchFetchOutcome::Failed {
                            match_id,
                            reason: cause,
                        };
                    }
                }
            }
        }

        MatchFetchOutcome::Failed {
            match_id,
            reason: format!("retry budget of {max_attempts} attempts exhausted"),
        }
    }
}
