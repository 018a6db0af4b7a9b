//! Riot API transport and endpoint wrappers

use crate::region::Region;
use crate::{Account, LeagueRanks, MatchId, RawMatch, Summoner};
use async_trait::async_trait;
use std::time::Duration;

pub mod http;
pub mod shared;

/// API errors for the fatal-path endpoints (account, listing, summoner,
/// league). Per-match fetch failures are values, not errors; see
/// [`FetchOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body or reason text
        message: String,
    },

    /// Network-level failure (timeout, DNS, connection refused)
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be deserialized
    #[error("parse error: {0}")]
    Parse(String),

    /// 429 on an endpoint with no local retry policy
    #[error("rate limited, retry after {wait:?}")]
    RateLimited {
        /// Server-requested wait before the next attempt
        wait: Duration,
    },

    /// RIOT_API_KEY is not set in the environment
    #[error("RIOT_API_KEY is not set; export it or add it to a .env file")]
    MissingApiKey,
}

/// Result type for fatal-path API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Tagged outcome of a single match-detail fetch attempt.
///
/// Exactly one branch holds data; callers must handle every branch. The
/// transport never retries; retry policy belongs to
/// [`crate::downloader::fetch::MatchFetcher`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx with a parseable body
    Success(Box<RawMatch>),
    /// Network failure, non-429 HTTP error, or unparseable body
    RetryableError(String),
    /// 429 with the server-requested wait (Retry-After, or the configured
    /// fallback when the header is absent)
    RateLimited {
        /// Seconds-to-wait conveyed by the response
        wait: Duration,
    },
}

/// The Riot API surface this crate consumes.
///
/// The trait is the seam between orchestration and transport: production
/// code uses [`http::RiotHttpClient`], tests script outcomes per match ID.
#[async_trait]
pub trait RiotApi: Send + Sync {
    /// Resolve a Riot ID (game name + tag line) to an account.
    async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> ApiResult<Account>;

    /// List ranked match IDs for a player, most recent first, bounded to
    /// `count`.
    async fn match_ids_by_puuid(
        &self,
        region: Region,
        puuid: &str,
        count: usize,
    ) -> ApiResult<Vec<MatchId>>;

    /// Fetch one match detail payload. All failure modes are represented in
    /// the return value; this call must not fail any other way.
    async fn match_by_id(&self, region: Region, match_id: &MatchId) -> FetchOutcome;

    /// Fetch summoner profile data (icon, level) for a player.
    async fn summoner_by_puuid(&self, region: Region, puuid: &str) -> ApiResult<Summoner>;

    /// Fetch ranked league standings for a player.
    async fn league_entries_by_puuid(&self, region: Region, puuid: &str)
        -> ApiResult<LeagueRanks>;
}

/// Data Dragon CDN URL for a profile icon id.
pub fn profile_icon_url(profile_icon_id: i64) -> String {
    format!("https://ddragon.leagueoflegends.com/cdn/15.21.1/img/profileicon/{profile_icon_id}.png")
}
