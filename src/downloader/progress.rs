//! Progress tracking for fetch sessions.
//!
//! A session over 100 match IDs can span minutes once rate-limit pauses pile
//! up. This module owns the counters and formatting behind the periodic
//! `[PROGRESS]` lines the session driver logs between rounds.

use std::time::{Duration, Instant};

const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_MIN_PERCENTAGE_STEP: f64 = 10.0;

/// Progress state for one fetch session.
#[derive(Debug, Clone)]
pub struct FetchProgress {
    /// Matches fetched so far across all rounds.
    pub fetched: u64,
    /// Match IDs abandoned so far.
    pub abandoned: u64,
    /// Total match IDs requested.
    pub total: u64,
    /// When the session's fetch phase started.
    pub start_time: Instant,
    /// Last time a progress line was emitted.
    pub last_update: Instant,
    /// Minimum interval between emitted lines.
    pub update_interval: Duration,
    /// Last reported completion percentage.
    pub last_reported_percentage: f64,
    /// Minimum percentage delta required to emit a new line.
    pub min_percentage_step: f64,
}

impl FetchProgress {
    /// Create progress state for a session requesting `total` matches.
    pub fn new(total: u64) -> Self {
        let now = Instant::now();
        Self {
            fetched: 0,
            abandoned: 0,
            total,
            start_time: now,
            last_update: now,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            last_reported_percentage: 0.0,
            min_percentage_step: DEFAULT_MIN_PERCENTAGE_STEP,
        }
    }

    /// Record the results of one batch round.
    pub fn update(&mut self, fetched: u64, abandoned: u64) {
        self.fetched = self.fetched.saturating_add(fetched);
        self.abandoned = self.abandoned.saturating_add(abandoned);
    }

    /// Fraction of requested IDs resolved (fetched or abandoned), 0-100.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        ((self.fetched + self.abandoned) as f64 / self.total as f64) * 100.0
    }

    /// Matches fetched per second since the fetch phase started.
    pub fn rate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.fetched as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Estimate time remaining from the observed fetch rate.
    pub fn estimate_remaining(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate <= 0.0 {
            return None;
        }
        let remaining = self
            .total
            .saturating_sub(self.fetched)
            .saturating_sub(self.abandoned);
        if remaining == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(remaining as f64 / rate))
    }

    /// Whether a progress line should be emitted based on time or percentage.
    pub fn should_emit_update(&self) -> bool {
        if self.fetched == 0 && self.abandoned == 0 {
            return false;
        }

        if self.percentage() - self.last_reported_percentage >= self.min_percentage_step {
            return true;
        }

        self.last_update.elapsed() >= self.update_interval
    }

    /// Call after emitting a progress line to reset timers and cached
    /// percentage.
    pub fn mark_emitted(&mut self) {
        self.last_update = Instant::now();
        self.last_reported_percentage = self.percentage();
    }

    /// Human-readable progress string for logging.
    pub fn format_progress(&self) -> String {
        let mut parts = vec![format!(
            "[PROGRESS] Fetched {}/{} matches - {:.1}% complete",
            self.fetched,
            self.total,
            self.percentage()
        )];

        if self.abandoned > 0 {
            parts.push(format!("({} abandoned)", self.abandoned));
        }

        let rate = self.rate();
        if rate > 0.0 {
            parts.push(format!("at {rate:.1} matches/sec"));
        }

        if let Some(remaining) = self.estimate_remaining() {
            parts.push(format!("- ~{} remaining", format_duration(remaining)));
        }

        parts.join(" ")
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}
