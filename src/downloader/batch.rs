//! Batch fan-out and result partitioning
//!
//! One batch schedules a fetch task per match ID, all sharing the session's
//! burst gate, and partitions the outcomes into kept successes, IDs to
//! retry, and abandoned IDs. The first long-wait signal stops the line:
//! every ID from that point in submission order is resubmitted later rather
//! than hammering a window that is already exhausted.

use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, warn};

use crate::downloader::fetch::{MatchFetchOutcome, MatchFetcher};
use crate::{MatchId, MatchRecord};

/// Partitioned result of one batch round.
///
/// Every submitted ID lands in exactly one of `succeeded` (by proxy of its
/// record), `to_retry`, or `failed`.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Records fetched this round
    pub succeeded: Vec<MatchRecord>,
    /// IDs to resubmit in a later round
    pub to_retry: Vec<MatchId>,
    /// IDs abandoned after exhausting their attempt budget
    pub failed: Vec<MatchId>,
    /// Wait to observe before the next round, when the rolling window was
    /// exhausted mid-batch
    pub long_wait: Option<Duration>,
}

impl BatchResult {
    /// Whether the session can stop resubmitting.
    pub fn is_complete(&self) -> bool {
        self.to_retry.is_empty()
    }
}

/// Concurrent fan-out of match fetches over one shared burst gate.
pub struct BatchFetcher {
    fetcher: MatchFetcher,
}

impl BatchFetcher {
    /// Wrap a per-match fetcher.
    pub fn new(fetcher: MatchFetcher) -> Self {
        Self { fetcher }
    }

    /// Run one batch round over `ids`.
    ///
    /// Outcomes are processed in submission order. The first long-wait
    /// signal keeps the successes recorded before it and moves every ID from
    /// that index onward into `to_retry` wholesale; refetching a match is
    /// idempotent, so discarding the few late successes is cheaper than
    /// tracking them across the pause.
    pub async fn run(&self, ids: &[MatchId]) -> BatchResult {
        debug!(batch_size = ids.len(), "Submitting fetch batch");

        let tasks = ids.iter().map(|id| self.fetcher.fetch_one(id.clone()));
        let outcomes = join_all(tasks).await;

        let mut result = BatchResult::default();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                MatchFetchOutcome::Fetched(record) => result.succeeded.push(*record),
                MatchFetchOutcome::LongWait(wait) => {
                    warn!(
                        wait_secs = wait.as_secs_f64(),
                        resubmitted = ids.len() - index,
                        "Long wait signalled - stopping the line for this batch"
                    );
                    result.long_wait = Some(wait);
                    result.to_retry.extend(ids[index..].iter().cloned());
                    break;
                }
                MatchFetchOutcome::Failed { match_id, reason } => {
                    warn!(%match_id, %reason, "Match abandoned this round");
                    result.failed.push(match_id);
                }
            }
        }

        debug!(
            succeeded = result.succeeded.len(),
            to_retry = result.to_retry.len(),
            failed = result.failed.len(),
            long_wait = result.long_wait.is_some(),
            "Batch complete"
        );
        result
    }
}
