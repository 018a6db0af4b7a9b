//! Fetch pipeline configuration
//!
//! The numeric defaults here are tuned against Riot's observed limits rather
//! than derived from documented guarantees, so every one of them is plain
//! configuration.

use std::time::Duration;

/// Maximum concurrent in-flight match-detail requests.
/// Riot enforces a short-burst cap independent of its rolling window.
pub const BURST_LIMIT: usize = 20;

/// Attempt budget per match ID within one batch round.
pub const MAX_ATTEMPTS: u32 = 5;

/// Fixed delay applied before every fetch attempt, smoothing aggregate
/// request rate even when the burst gate is wide open.
pub const INTER_REQUEST_DELAY: Duration = Duration::from_millis(1500);

/// A 429 wait above this threshold means the rolling window is exhausted for
/// the whole client, not just one request.
pub const LONG_WAIT_THRESHOLD: Duration = Duration::from_secs(5);

/// Margin added on top of a server-requested wait before retrying.
pub const RETRY_MARGIN: Duration = Duration::from_millis(500);

/// Session-level cap on fetch rounds; a safety net against a remote service
/// that never stops returning retryable errors.
pub const MAX_ROUNDS: u32 = 10;

/// Tunable knobs for the fetch pipeline.
///
/// Defaults mirror the constants above; tests shrink the durations to keep
/// timing-sensitive assertions fast.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum concurrent in-flight fetches
    pub burst_limit: usize,
    /// Attempt budget per match ID per round
    pub max_attempts: u32,
    /// Fixed delay before every attempt
    pub inter_request_delay: Duration,
    /// Boundary between a local retry and a session-wide pause
    pub long_wait_threshold: Duration,
    /// Margin added to server-requested waits
    pub retry_margin: Duration,
    /// Maximum fetch rounds per session
    pub max_rounds: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            burst_limit: BURST_LIMIT,
            max_attempts: MAX_ATTEMPTS,
            inter_request_delay: INTER_REQUEST_DELAY,
            long_wait_threshold: LONG_WAIT_THRESHOLD,
            retry_margin: RETRY_MARGIN,
            max_rounds: MAX_ROUNDS,
        }
    }
}

impl FetchConfig {
    /// Override the burst capacity.
    pub fn with_burst_limit(mut self, burst_limit: usize) -> Self {
        self.burst_limit = burst_limit;
        self
    }

    /// Override the per-ID attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Override the fixed inter-request delay.
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Override the long-wait threshold.
    pub fn with_long_wait_threshold(mut self, threshold: Duration) -> Self {
        self.long_wait_threshold = threshold;
        self
    }

    /// Override the retry margin.
    pub fn with_retry_margin(mut self, margin: Duration) -> Self {
        self.retry_margin = margin;
        self
    }

    /// Override the session round cap.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Validate configuration bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.burst_limit == 0 {
            return Err("burst_limit must be at least 1".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        Ok(())
    }
}
