//! Integration tests for the per-match retry loop

use crate::common::{test_config, ScriptedApi, Step, PUUID};
use riot_match_downloader::downloader::{BurstLimiter, MatchFetchOutcome, MatchFetcher};
use riot_match_downloader::region::Region;
use riot_match_downloader::MatchId;
use std::sync::Arc;
use std::time::Duration;

fn fetcher(api: Arc<ScriptedApi>, max_attempts: u32) -> MatchFetcher {
    MatchFetcher::new(
        api,
        Arc::new(BurstLimiter::new(20)),
        test_config().with_max_attempts(max_attempts),
        Region::Na,
        PUUID,
    )
}

#[tokio::test]
async fn test_short_rate_limit_retries_locally_and_succeeds() {
    let api = Arc::new(ScriptedApi::new(1).with_script(
        "M1",
        vec![Step::RateLimited(Duration::from_millis(20)), Step::Ok],
    ));
    let fetcher = fetcher(api.clone(), 5);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    match outcome {
        MatchFetchOutcome::Fetched(record) => assert_eq!(record.match_id.as_str(), "M1"),
        other => panic!("expected Fetched, got {other:?}"),
    }
    assert_eq!(api.attempts_for("M1"), 2);
}

#[tokio::test]
async fn test_long_wait_escalates_without_local_retry() {
    let api = Arc::new(ScriptedApi::new(1).with_script(
        "M1",
        vec![Step::RateLimited(Duration::from_millis(500)), Step::Ok],
    ));
    // test_config's long-wait threshold is 100ms, so 500ms must escalate.
    let fetcher = fetcher(api.clone(), 5);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    match outcome {
        MatchFetchOutcome::LongWait(wait) => assert_eq!(wait, Duration::from_millis(500)),
        other => panic!("expected LongWait, got {other:?}"),
    }
    assert_eq!(api.attempts_for("M1"), 1, "long wait must not retry locally");
}

#[tokio::test]
async fn test_retryable_errors_consume_budget_then_fail() {
    let api = Arc::new(ScriptedApi::new(1).with_script("M1", vec![Step::Retryable; 10]));
    let fetcher = fetcher(api.clone(), 3);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    match outcome {
        MatchFetchOutcome::Failed { match_id, reason } => {
            assert_eq!(match_id.as_str(), "M1");
            assert!(reason.contains("502"), "reason should carry the cause: {reason}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(api.attempts_for("M1"), 3);
}

#[tokio::test]
async fn test_retryable_then_success_within_budget() {
    let api = Arc::new(
        ScriptedApi::new(1).with_script("M1", vec![Step::Retryable, Step::Retryable, Step::Ok]),
    );
    let fetcher = fetcher(api.clone(), 5);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    assert!(matches!(outcome, MatchFetchOutcome::Fetched(_)));
    assert_eq!(api.attempts_for("M1"), 3);
}

#[tokio::test]
async fn test_rate_limited_on_final_attempt_fails() {
    let api = Arc::new(ScriptedApi::new(1).with_script(
        "M1",
        vec![Step::RateLimited(Duration::from_millis(5)); 5],
    ));
    let fetcher = fetcher(api.clone(), 2);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    match outcome {
        MatchFetchOutcome::Failed { reason, .. } => {
            assert!(reason.contains("rate limited"), "unexpected reason: {reason}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_player_missing_from_payload_is_terminal() {
    let api = Arc::new(ScriptedApi::new(1).with_script("M1", vec![Step::OkWithoutPlayer]));
    let fetcher = fetcher(api.clone(), 5);

    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    match outcome {
        MatchFetchOutcome::Failed { reason, .. } => {
            assert!(reason.contains("participant"), "unexpected reason: {reason}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(api.attempts_for("M1"), 1, "payload defects must not retry");
}

#[tokio::test]
async fn test_inter_request_delay_paces_every_attempt() {
    let api = Arc::new(ScriptedApi::new(1).with_script("M1", vec![Step::Retryable, Step::Ok]));
    let fetcher = MatchFetcher::new(
        api,
        Arc::new(BurstLimiter::new(20)),
        test_config().with_inter_request_delay(Duration::from_millis(40)),
        Region::Na,
        PUUID,
    );

    let started = std::time::Instant::now();
    let outcome = fetcher.fetch_one(MatchId::new("M1")).await;

    assert!(matches!(outcome, MatchFetchOutcome::Fetched(_)));
    assert!(
        started.elapsed() >= Duration::from_millis(80),
        "two attempts must pay the fixed delay twice, took {:?}",
        started.elapsed()
    );
}
