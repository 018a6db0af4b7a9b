//! Shared test support: a scripted in-memory Riot API
//!
//! Each match ID gets a queue of scripted outcomes consumed one per fetch
//! attempt; an exhausted (or absent) queue yields success. The mock also
//! instruments concurrency so tests can assert the burst cap held.

use async_trait::async_trait;
use riot_match_downloader::api::{ApiError, ApiResult, FetchOutcome, RiotApi};
use riot_match_downloader::region::Region;
use riot_match_downloader::{
    Account, LeagueRanks, MatchId, MatchInfo, MatchMetadata, Participant, RawMatch, Summoner,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// The puuid every scripted account resolves to.
pub const PUUID: &str = "scripted-puuid";

/// One scripted outcome for a single fetch attempt.
#[derive(Debug, Clone)]
pub enum Step {
    /// 2xx with a well-formed payload
    Ok,
    /// 2xx but the requesting player is absent from the participant list
    OkWithoutPlayer,
    /// Network or non-429 HTTP failure
    Retryable,
    /// 429 with this wait
    RateLimited(Duration),
}

fn participant(puuid: &str) -> Participant {
    Participant {
        puuid: puuid.to_string(),
        champion_name: "Ahri".to_string(),
        team_position: "MIDDLE".to_string(),
        win: true,
        kills: 4,
        deaths: 2,
        assists: 6,
        total_minions_killed: 160,
        neutral_minions_killed: 8,
        gold_earned: 10_400,
        vision_score: 19,
        wards_placed: 7,
        total_damage_dealt_to_champions: 21_000,
        total_damage_taken: 15_000,
        challenges: serde_json::Map::new(),
    }
}

/// Build a deterministic match payload containing the scripted player.
pub fn raw_match(match_id: &str, with_player: bool) -> RawMatch {
    let mut participants = vec![participant("enemy-1"), participant("enemy-2")];
    if with_player {
        participants.insert(0, participant(PUUID));
    }
    RawMatch {
        metadata: MatchMetadata {
            match_id: match_id.to_string(),
        },
        info: MatchInfo {
            queue_id: 420,
            game_duration: 1700,
            game_creation: 1_730_000_000_000,
            participants,
        },
    }
}

/// Scripted [`RiotApi`] implementation.
pub struct ScriptedApi {
    match_ids: Vec<MatchId>,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    attempts: Mutex<HashMap<String, usize>>,
    request_latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail_account: bool,
    fail_listing: bool,
}

impl ScriptedApi {
    /// A mock serving `count` match IDs named `M1..Mcount`, all succeeding.
    pub fn new(count: usize) -> Self {
        Self {
            match_ids: (1..=count).map(|i| MatchId::new(format!("M{i}"))).collect(),
            scripts: Mutex::new(HashMap::new()),
            attempts: Mutex::new(HashMap::new()),
            request_latency: Duration::from_millis(5),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fail_account: false,
            fail_listing: false,
        }
    }

    /// Script the outcome queue for one match ID.
    pub fn with_script(self, match_id: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(match_id.to_string(), steps.into());
        self
    }

    /// Simulated per-request latency (gives concurrency a chance to overlap).
    pub fn with_request_latency(mut self, latency: Duration) -> Self {
        self.request_latency = latency;
        self
    }

    /// Make account resolution fail.
    pub fn with_account_error(mut self) -> Self {
        self.fail_account = true;
        self
    }

    /// Make match-ID listing fail.
    pub fn with_listing_error(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Fetch attempts recorded for one match ID.
    pub fn attempts_for(&self, match_id: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(match_id)
            .copied()
            .unwrap_or(0)
    }

    /// Highest number of concurrently in-flight match fetches observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_step(&self, match_id: &str) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        scripts
            .get_mut(match_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Step::Ok)
    }
}

#[async_trait]
impl RiotApi for ScriptedApi {
    async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> ApiResult<Account> {
        if self.fail_account {
            return Err(ApiError::Http {
                status: 403,
                message: "forbidden".to_string(),
            });
        }
        Ok(Account {
            puuid: PUUID.to_string(),
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }

    async fn match_ids_by_puuid(
        &self,
        _region: Region,
        _puuid: &str,
        count: usize,
    ) -> ApiResult<Vec<MatchId>> {
        if self.fail_listing {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        Ok(self.match_ids.iter().take(count).cloned().collect())
    }

    async fn match_by_id(&self, _region: Region, match_id: &MatchId) -> FetchOutcome {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(match_id.as_str().to_string())
            .or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.request_latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.next_step(match_id.as_str()) {
            Step::Ok => FetchOutcome::Success(Box::new(raw_match(match_id.as_str(), true))),
            Step::OkWithoutPlayer => {
                FetchOutcome::Success(Box::new(raw_match(match_id.as_str(), false)))
            }
            Step::Retryable => FetchOutcome::RetryableError("HTTP error 502: bad gateway".to_string()),
            Step::RateLimited(wait) => FetchOutcome::RateLimited { wait },
        }
    }

    async fn summoner_by_puuid(&self, _region: Region, _puuid: &str) -> ApiResult<Summoner> {
        Ok(Summoner {
            profile_icon_id: 4567,
            summoner_level: 231,
        })
    }

    async fn league_entries_by_puuid(
        &self,
        _region: Region,
        _puuid: &str,
    ) -> ApiResult<LeagueRanks> {
        Ok(LeagueRanks::default())
    }
}

/// A fast [`riot_match_downloader::downloader::FetchConfig`] for tests.
///
/// Durations are scaled down three orders of magnitude from the production
/// defaults so timing-sensitive assertions stay fast.
pub fn test_config() -> riot_match_downloader::downloader::FetchConfig {
    riot_match_downloader::downloader::FetchConfig::default()
        .with_inter_request_delay(Duration::from_millis(2))
        .with_long_wait_threshold(Duration::from_millis(100))
        .with_retry_margin(Duration::from_millis(2))
}
