//! Integration tests for the session state machine

use crate::common::{test_config, ScriptedApi, Step, PUUID};
use riot_match_downloader::downloader::{MatchHistorySession, SessionError};
use riot_match_downloader::region::Region;
use riot_match_downloader::shutdown::ShutdownCoordinator;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_clean_session_fetches_everything() {
    let api = Arc::new(ScriptedApi::new(20));
    let session = MatchHistorySession::new(api).with_config(test_config());

    let outcome = session.run("Berserk", "KNG0", Region::Na, 20).await.unwrap();

    assert_eq!(outcome.account.puuid, PUUID);
    assert_eq!(outcome.matches.len(), 20);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.rounds, 1);
}

#[tokio::test]
async fn test_listing_bounded_by_count() {
    let api = Arc::new(ScriptedApi::new(50));
    let session = MatchHistorySession::new(api).with_config(test_config());

    let outcome = session.run("Berserk", "KNG0", Region::Na, 10).await.unwrap();
    assert_eq!(outcome.matches.len(), 10);
}

#[tokio::test]
async fn test_account_failure_is_fatal() {
    let api = Arc::new(ScriptedApi::new(5).with_account_error());
    let session = MatchHistorySession::new(api).with_config(test_config());

    let err = session.run("Berserk", "KNG0", Region::Na, 5).await.unwrap_err();
    assert!(matches!(err, SessionError::AccountLookup(_)));
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let api = Arc::new(ScriptedApi::new(5).with_listing_error());
    let session = MatchHistorySession::new(api).with_config(test_config());

    let err = session.run("Berserk", "KNG0", Region::Na, 5).await.unwrap_err();
    assert!(matches!(err, SessionError::MatchListing(_)));
}

#[tokio::test]
async fn test_long_wait_pauses_session_then_recovers() {
    // M5 exhausts the window once; the session must sleep roughly the
    // signalled wait before resubmitting, and still end complete.
    let wait = Duration::from_millis(300);
    let api = Arc::new(
        ScriptedApi::new(10).with_script("M5", vec![Step::RateLimited(wait), Step::Ok]),
    );
    let session = MatchHistorySession::new(api).with_config(test_config());

    let started = Instant::now();
    let outcome = session.run("Berserk", "KNG0", Region::Na, 10).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.matches.len(), 10);
    assert!(outcome.failed.is_empty());
    assert!(outcome.rounds >= 2, "long wait must force a second round");
    assert!(
        elapsed >= wait,
        "session must sleep through the signalled wait, took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_terminal_ids_end_in_failed_without_hanging() {
    let api = Arc::new(ScriptedApi::new(6).with_script("M4", vec![Step::Retryable; 20]));
    let session =
        MatchHistorySession::new(api).with_config(test_config().with_max_attempts(5));

    let outcome = session.run("Berserk", "KNG0", Region::Na, 6).await.unwrap();

    assert_eq!(outcome.matches.len(), 5);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].as_str(), "M4");
}

#[tokio::test]
async fn test_conservation_no_id_lost_or_duplicated() {
    let api = Arc::new(
        ScriptedApi::new(10)
            .with_script("M2", vec![Step::Retryable; 20])
            .with_script("M7", vec![Step::RateLimited(Duration::from_millis(200)), Step::Ok]),
    );
    let session =
        MatchHistorySession::new(api).with_config(test_config().with_max_attempts(3));

    let outcome = session.run("Berserk", "KNG0", Region::Na, 10).await.unwrap();

    assert_eq!(
        outcome.matches.len() + outcome.failed.len(),
        10,
        "every listed ID must end fetched or abandoned"
    );

    let mut all: Vec<&str> = outcome
        .matches
        .iter()
        .map(|r| r.match_id.as_str())
        .chain(outcome.failed.iter().map(|id| id.as_str()))
        .collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 10, "no ID may appear twice");
}

#[tokio::test]
async fn test_round_cap_abandons_stuck_ids() {
    // M1 signals a long wait forever; the round cap must end the session
    // with M1 abandoned instead of looping indefinitely.
    let api = Arc::new(ScriptedApi::new(1).with_script(
        "M1",
        vec![Step::RateLimited(Duration::from_millis(150)); 20],
    ));
    let session =
        MatchHistorySession::new(api).with_config(test_config().with_max_rounds(3));

    let outcome = session.run("Berserk", "KNG0", Region::Na, 1).await.unwrap();

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.rounds, 4, "cap is checked entering the round after the last");
}

#[tokio::test]
async fn test_refetch_is_idempotent() {
    let api = Arc::new(ScriptedApi::new(3));
    let session = MatchHistorySession::new(api.clone()).with_config(test_config());
    let first = session.run("Berserk", "KNG0", Region::Na, 3).await.unwrap();

    let session = MatchHistorySession::new(api).with_config(test_config());
    let second = session.run("Berserk", "KNG0", Region::Na, 3).await.unwrap();

    let first_json = serde_json::to_string(&first.matches).unwrap();
    let second_json = serde_json::to_string(&second.matches).unwrap();
    assert_eq!(first_json, second_json, "remote match data is immutable");
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    // The canonical shape: 8 clean IDs, one short-429 recovery, one ID that
    // never stops erroring. Expect 9 records, 1 abandoned, and a session
    // duration that paid at least the per-attempt pacing for the worst ID
    // plus the short wait.
    let delay = Duration::from_millis(20);
    let short_wait = Duration::from_millis(60);
    let api = Arc::new(
        ScriptedApi::new(10)
            .with_script("M9", vec![Step::RateLimited(short_wait), Step::Ok])
            .with_script("M10", vec![Step::Retryable; 20]),
    );
    let session = MatchHistorySession::new(api).with_config(
        test_config()
            .with_max_attempts(5)
            .with_inter_request_delay(delay)
            .with_long_wait_threshold(Duration::from_millis(100)),
    );

    let started = Instant::now();
    let outcome = session.run("Berserk", "KNG0", Region::Na, 10).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.matches.len(), 9);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].as_str(), "M10");

    // Chains run concurrently, so the duration floor is the slowest chain:
    // M10 pays the fixed delay five times, M9 pays it twice plus the wait.
    let floor = std::cmp::max(delay * 5, delay * 2 + short_wait);
    assert!(
        elapsed >= floor,
        "expected at least {floor:?} of pacing and waits, took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_shutdown_cancels_waiting_session() {
    let api = Arc::new(ScriptedApi::new(2).with_script(
        "M1",
        vec![Step::RateLimited(Duration::from_secs(120)); 5],
    ));
    let shutdown = ShutdownCoordinator::shared();
    let session = MatchHistorySession::new(api)
        .with_config(test_config())
        .with_shutdown(shutdown.clone());

    let handle = tokio::spawn(async move {
        session.run("Berserk", "KNG0", Region::Na, 2).await
    });

    // Give the session time to enter the two-minute window pause.
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.request_shutdown();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(SessionError::Cancelled)));
}
