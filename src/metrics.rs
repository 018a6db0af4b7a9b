//! Observability metrics for the match fetch pipeline
//!
//! Tracks Riot API request outcomes, 429 pressure, retry volume, long-window
//! pauses, and per-session totals.
//!
//! ## Architecture
//!
//! - Uses the `metrics` crate for low-overhead collection
//! - Prometheus exporter behind an opt-in scrape address
//! - Recording is a no-op until a recorder is installed, so library users
//!   who never call [`init_metrics`] pay nothing

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Correlation ID generator for request tracing
static CORRELATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Initialize the metrics system with a Prometheus exporter.
///
/// Call once at application startup; the function is idempotent.
///
/// # Arguments
/// * `addr` - Socket address to bind the Prometheus scrape endpoint
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "riot_requests_total",
        Unit::Count,
        "Total number of HTTP requests made to the Riot API"
    );

    describe_counter!(
        "riot_429_total",
        Unit::Count,
        "Total number of 429 rate limit responses received"
    );

    describe_counter!(
        "riot_retries_total",
        Unit::Count,
        "Total number of per-match retry attempts"
    );

    describe_counter!(
        "riot_long_waits_total",
        Unit::Count,
        "Total number of session-wide pauses for an exhausted rolling window"
    );

    describe_histogram!(
        "riot_request_duration_seconds",
        Unit::Seconds,
        "HTTP request duration in seconds"
    );

    describe_histogram!(
        "riot_rate_limit_wait_seconds",
        Unit::Seconds,
        "Duration of local rate-limit waits in seconds"
    );

    describe_histogram!(
        "riot_long_wait_seconds",
        Unit::Seconds,
        "Duration of session-wide rolling-window pauses in seconds"
    );

    describe_counter!(
        "matches_fetched_total",
        Unit::Count,
        "Total number of match records fetched successfully"
    );

    describe_counter!(
        "matches_abandoned_total",
        Unit::Count,
        "Total number of match IDs abandoned after exhausting retries"
    );

    describe_counter!(
        "sessions_completed_total",
        Unit::Count,
        "Total number of fetch sessions that ran to completion"
    );

    describe_counter!(
        "sessions_failed_total",
        Unit::Count,
        "Total number of fetch sessions aborted by a fatal error"
    );

    describe_histogram!(
        "session_duration_seconds",
        Unit::Seconds,
        "Fetch session duration in seconds"
    );

    *initialized = true;
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Check if the metrics system is initialized.
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}

/// Generate a new correlation ID for request tracing.
pub fn generate_correlation_id() -> String {
    let n = CORRELATION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("req-{n:08x}")
}

/// Records one HTTP request's outcome with timing.
pub struct RequestMetrics {
    endpoint: &'static str,
    start_time: Instant,
    correlation_id: String,
}

impl RequestMetrics {
    /// Start recording a new HTTP request.
    pub fn start(endpoint: &'static str) -> Self {
        let correlation_id = generate_correlation_id();

        debug!(
            correlation_id = %correlation_id,
            endpoint,
            "Starting HTTP request"
        );

        Self {
            endpoint,
            start_time: Instant::now(),
            correlation_id,
        }
    }

    /// Record completion of the HTTP request with its status code.
    pub fn record_status(&self, status_code: u16) {
        let duration = self.start_time.elapsed();

        counter!(
            "riot_requests_total",
            "endpoint" => self.endpoint,
            "status" => status_code.to_string(),
        )
        .increment(1);

        histogram!(
            "riot_request_duration_seconds",
            "endpoint" => self.endpoint,
        )
        .record(duration.as_secs_f64());

        if status_code == 429 {
            counter!(
                "riot_429_total",
                "endpoint" => self.endpoint,
            )
            .increment(1);

            warn!(
                correlation_id = %self.correlation_id,
                endpoint = self.endpoint,
                duration_ms = duration.as_millis(),
                "Rate limit response (429) recorded"
            );
        }

        debug!(
            correlation_id = %self.correlation_id,
            endpoint = self.endpoint,
            status = status_code,
            duration_ms = duration.as_millis(),
            "HTTP request completed"
        );
    }

    /// Record a network error (no status code).
    pub fn record_network_error(&self) {
        let duration = self.start_time.elapsed();

        counter!(
            "riot_requests_total",
            "endpoint" => self.endpoint,
            "status" => "network_error",
        )
        .increment(1);

        histogram!(
            "riot_request_duration_seconds",
            "endpoint" => self.endpoint,
        )
        .record(duration.as_secs_f64());

        warn!(
            correlation_id = %self.correlation_id,
            endpoint = self.endpoint,
            duration_ms = duration.as_millis(),
            "Network error recorded"
        );
    }

    /// Get the correlation ID for this request.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Record one per-match retry attempt.
pub fn record_retry(attempt: u32) {
    counter!(
        "riot_retries_total",
        "attempt" => attempt.to_string(),
    )
    .increment(1);
}

/// Record a local rate-limit wait before a retry.
pub fn record_rate_limit_wait(wait: Duration, attempt: u32) {
    counter!(
        "riot_retries_total",
        "attempt" => attempt.to_string(),
    )
    .increment(1);

    histogram!("riot_rate_limit_wait_seconds").record(wait.as_secs_f64());

    debug!(
        attempt,
        wait_ms = wait.as_millis(),
        "Rate-limit wait recorded"
    );
}

/// Record a session-wide pause for an exhausted rolling window.
pub fn record_long_wait(wait: Duration) {
    counter!("riot_long_waits_total").increment(1);
    histogram!("riot_long_wait_seconds").record(wait.as_secs_f64());

    debug!(wait_ms = wait.as_millis(), "Long-window pause recorded");
}

/// Per-session metrics helper.
pub struct SessionMetrics {
    player: String,
    region: String,
    start_time: Instant,
}

impl SessionMetrics {
    /// Start tracking a fetch session.
    pub fn start(player: impl Into<String>, region: impl Into<String>) -> Self {
        let player = player.into();
        let region = region.into();

        info!(player = %player, region = %region, "Fetch session started");

        Self {
            player,
            region,
            start_time: Instant::now(),
        }
    }

    /// Record a session that ran to completion.
    pub fn record_complete(&self, fetched: u64, abandoned: u64) {
        let duration = self.start_time.elapsed();

        counter!(
            "sessions_completed_total",
            "region" => self.region.clone(),
        )
        .increment(1);
        counter!("matches_fetched_total").increment(fetched);
        counter!("matches_abandoned_total").increment(abandoned);
        histogram!("session_duration_seconds").record(duration.as_secs_f64());

        info!(
            player = %self.player,
            region = %self.region,
            fetched,
            abandoned,
            duration_secs = duration.as_secs(),
            "Fetch session completed"
        );
    }

    /// Record a session aborted by a fatal error.
    pub fn record_fatal(&self, error: &str) {
        let duration = self.start_time.elapsed();

        counter!(
            "sessions_failed_total",
            "region" => self.region.clone(),
        )
        .increment(1);
        histogram!("session_duration_seconds").record(duration.as_secs_f64());

        error!(
            player = %self.player,
            region = %self.region,
            error = %error,
            duration_secs = duration.as_secs(),
            "Fetch session failed"
        );
    }
}
