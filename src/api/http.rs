//! Riot HTTP client
//!
//! Provides the single-request transport for all Riot API interactions:
//! - One GET per call with the `X-Riot-Token` header
//! - 429 detection with `Retry-After` extraction
//! - Every failure mode represented in the return value
//!
//! No retrying happens here; retry policy lives in the downloader layer.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::shared::global_http_client;
use crate::api::{ApiError, ApiResult, FetchOutcome, RiotApi};
use crate::metrics::RequestMetrics;
use crate::region::Region;
use crate::{Account, LeagueEntry, LeagueRanks, MatchId, RawMatch, Summoner};

/// Account-v1 lives on a fixed cluster regardless of the player's shard.
const ACCOUNT_HOST: &str = "asia.api.riotgames.com";

/// Fallback wait applied when a 429 response omits the Retry-After header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

/// HTTP transport for the Riot API.
///
/// Cheap to clone via the shared connection-pooled client; safe to share
/// across concurrent fetch tasks.
pub struct RiotHttpClient {
    client: Arc<Client>,
    api_key: String,
    default_retry_after: Duration,
}

impl RiotHttpClient {
    /// Create a client with an explicit API key, using the shared
    /// connection-pooled HTTP client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: global_http_client(),
            api_key: api_key.into(),
            default_retry_after: DEFAULT_RETRY_AFTER,
        }
    }

    /// Create a client from the `RIOT_API_KEY` environment variable.
    pub fn from_env() -> ApiResult<Self> {
        let api_key = std::env::var("RIOT_API_KEY").map_err(|_| ApiError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        Ok(Self::new(api_key))
    }

    /// Override the shared HTTP client (e.g. with custom timeouts).
    pub fn with_client(mut self, client: Arc<Client>) -> Self {
        self.client = client;
        self
    }

    /// Override the fallback wait used when Retry-After is absent.
    pub fn with_default_retry_after(mut self, wait: Duration) -> Self {
        self.default_retry_after = wait;
        self
    }

    /// Issue one GET and map the response into the fatal-path error space.
    ///
    /// 429 maps to [`ApiError::RateLimited`]; callers that need the
    /// value-typed outcome instead go through [`Self::fetch_outcome`].
    async fn get_json<T>(&self, url: Url, endpoint: &'static str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let metrics = RequestMetrics::start(endpoint);
        debug!(%url, "Issuing GET request");

        let response = match self
            .client
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                metrics.record_network_error();
                return Err(ApiError::Network(e.to_string()));
            }
        };

        let status = response.status();
        metrics.record_status(status.as_u16());

        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = parse_retry_after(response.headers(), self.default_retry_after);
            warn!(endpoint, wait_secs = wait.as_secs_f64(), "Rate limit response (429)");
            return Err(ApiError::RateLimited { wait });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Issue one GET and fold every failure mode into a [`FetchOutcome`].
    async fn fetch_outcome(&self, url: Url, endpoint: &'static str) -> FetchOutcome {
        match self.get_json::<RawMatch>(url, endpoint).await {
            Ok(raw) => FetchOutcome::Success(Box::new(raw)),
            Err(ApiError::RateLimited { wait }) => FetchOutcome::RateLimited { wait },
            Err(e) => FetchOutcome::RetryableError(e.to_string()),
        }
    }

    /// Build a URL from a host and already-safe path segments.
    ///
    /// Segments are percent-encoded individually so game names containing
    /// spaces or non-ASCII characters route correctly.
    fn build_url(host: &str, segments: &[&str], query: &[(&str, String)]) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("https://{host}"))
            .map_err(|e| ApiError::Parse(format!("invalid host {host}: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Parse(format!("host {host} cannot carry a path")))?;
            for segment in segments {
                path.push(segment);
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Extract the server-requested wait from a 429 response.
///
/// Riot conveys seconds-to-wait in `Retry-After`; an absent or unparseable
/// header falls back to the supplied default.
fn parse_retry_after(headers: &HeaderMap, default: Duration) -> Duration {
    let Some(value) = headers.get("Retry-After") else {
        return default;
    };
    let Ok(text) = value.to_str() else {
        warn!("Retry-After header is not valid UTF-8, using fallback");
        return default;
    };
    match text.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(e) => {
            warn!(header = text, error = %e, "Failed to parse Retry-After, using fallback");
            default
        }
    }
}

/// Wire shape of one league-v4 entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueEntryWire {
    #[serde(default)]
    queue_type: String,
    #[serde(default)]
    tier: String,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    league_points: i64,
    #[serde(default)]
    wins: i64,
    #[serde(default)]
    losses: i64,
}

impl LeagueEntryWire {
    fn into_entry(self) -> LeagueEntry {
        LeagueEntry {
            tier: self.tier,
            rank: self.rank,
            lp: self.league_points,
            wins: self.wins,
            losses: self.losses,
        }
    }
}

fn fold_league_entries(entries: Vec<LeagueEntryWire>) -> LeagueRanks {
    let mut ranks = LeagueRanks::default();
    for entry in entries {
        match entry.queue_type.as_str() {
            "RANKED_SOLO_5x5" => ranks.solo = Some(entry.into_entry()),
            "RANKED_FLEX_SR" => ranks.flex = Some(entry.into_entry()),
            _ => {}
        }
    }
    ranks
}

#[async_trait]
impl RiotApi for RiotHttpClient {
    async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> ApiResult<Account> {
        let url = Self::build_url(
            ACCOUNT_HOST,
            &[
                "riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line,
            ],
            &[],
        )?;
        self.get_json(url, "account-by-riot-id").await
    }

    async fn match_ids_by_puuid(
        &self,
        region: Region,
        puuid: &str,
        count: usize,
    ) -> ApiResult<Vec<MatchId>> {
        let url = Self::build_url(
            region.routing().host(),
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
            &[
                ("type", "ranked".to_string()),
                ("start", "0".to_string()),
                ("count", count.to_string()),
            ],
        )?;
        let ids: Vec<String> = self.get_json(url, "match-ids-by-puuid").await?;
        Ok(ids.into_iter().map(MatchId::new).collect())
    }

    async fn match_by_id(&self, region: Region, match_id: &MatchId) -> FetchOutcome {
        let url = match Self::build_url(
            region.routing().host(),
            &["lol", "match", "v5", "matches", match_id.as_str()],
            &[],
        ) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::RetryableError(e.to_string()),
        };
        self.fetch_outcome(url, "match-by-id").await
    }

    async fn summoner_by_puuid(&self, region: Region, puuid: &str) -> ApiResult<Summoner> {
        let url = Self::build_url(
            &region.platform_host(),
            &["lol", "summoner", "v4", "summoners", "by-puuid", puuid],
            &[],
        )?;
        self.get_json(url, "summoner-by-puuid").await
    }

    async fn league_entries_by_puuid(
        &self,
        region: Region,
        puuid: &str,
    ) -> ApiResult<LeagueRanks> {
        let url = Self::build_url(
            &region.platform_host(),
            &["lol", "league", "v4", "entries", "by-puuid", puuid],
            &[],
        )?;
        let entries: Vec<LeagueEntryWire> = self.get_json(url, "league-entries-by-puuid").await?;
        Ok(fold_league_entries(entries))
    }
}
