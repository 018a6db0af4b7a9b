//! # Riot Match Downloader Library
//!
//! A library for downloading a player's League of Legends match history from
//! the Riot Games API. Designed around the realities of Riot's rate limits:
//! short-burst caps, a longer rolling request window, and `Retry-After`
//! driven 429 responses.
//!
//! ## Features
//!
//! - **Account Resolution**: Riot ID (game name + tag line) to puuid lookup
//! - **Concurrent Match Fetching**: Burst-capped concurrent detail retrieval
//! - **Rate-Limit Recovery**: Local retries for short waits, session-wide
//!   pauses when the rolling window is exhausted
//! - **Partial-Failure Safety**: Already-fetched matches are never lost;
//!   exhausted match IDs are reported, not raised
//! - **Session Cache**: Bounded in-process LRU cache of completed sessions
//!
//! ## Quick Start
//!
//! ```no_run
//! use riot_match_downloader::api::http::RiotHttpClient;
//! use riot_match_downloader::downloader::MatchHistorySession;
//! use riot_match_downloader::region::Region;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(RiotHttpClient::from_env()?);
//! let session = MatchHistorySession::new(api);
//! let outcome = session.run("HideOnBush", "KR1", Region::Kr, 100).await?;
//! println!("fetched {} matches, {} failed", outcome.matches.len(), outcome.failed.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several core modules:
//!
//! - [`region`] - Shard parsing and routing/platform host mapping
//! - [`api`] - Riot API transport with rate-limit detection
//! - [`downloader`] - Fetch orchestration: burst control, per-match retries,
//!   batch fan-out, and the session state machine
//! - [`cache`] - Bounded LRU cache of completed sessions
//! - [`metrics`] - Prometheus observability for requests and sessions
//!
//! ## Data Types
//!
//! - [`MatchId`] - Opaque handle to one match
//! - [`MatchRecord`] - Full match detail merged with the requesting player's
//!   participant slice
//! - [`Participant`] - Per-player stat line including raw challenge metrics
//! - [`Account`] / [`Summoner`] / [`LeagueRanks`] - Identity and ranked data

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Riot API transport and endpoint wrappers
pub mod api;

/// Bounded LRU cache of completed fetch sessions
pub mod cache;

/// CLI command implementations
pub mod cli;

/// Fetch orchestration: burst control, retries, batching, session driver
pub mod downloader;

/// Observability metrics
pub mod metrics;

/// Region shard parsing and API host routing
pub mod region;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

// Re-export commonly used types
pub use downloader::session::{MatchHistorySession, SessionOutcome};
pub use region::Region;

/// Opaque handle to one match, unique within the Riot API.
///
/// A match ID has no lifecycle of its own beyond being pending, fetched, or
/// abandoned within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Wrap a raw match ID string (e.g. "NA1_5201886289").
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// The underlying ID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Queue classification derived from the numeric queue id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueType {
    /// Ranked Solo/Duo (queue id 420)
    SoloDuo,
    /// Ranked Flex (queue id 440)
    Flex,
    /// Any other queue
    Other,
}

impl QueueType {
    /// Classify a numeric queue id.
    pub fn from_queue_id(queue_id: i64) -> Self {
        match queue_id {
            420 => QueueType::SoloDuo,
            440 => QueueType::Flex,
            _ => QueueType::Other,
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueueType::SoloDuo => "Solo/Duo",
            QueueType::Flex => "Flex",
            QueueType::Other => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// Resolved Riot account identity.
///
/// Immutable once resolved; looked up once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable opaque player identifier
    pub puuid: String,
    /// Game name half of the Riot ID
    #[serde(default)]
    pub game_name: String,
    /// Tag line half of the Riot ID
    #[serde(default)]
    pub tag_line: String,
}

/// Summoner profile data from summoner-v4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    /// Profile icon id, resolvable to a Data Dragon CDN URL
    #[serde(default)]
    pub profile_icon_id: i64,
    /// Summoner level
    #[serde(default)]
    pub summoner_level: i64,
}

/// One ranked ladder entry (tier/rank/LP and win-loss record).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueEntry {
    /// Tier name (e.g. "GOLD")
    pub tier: String,
    /// Division within the tier (e.g. "II")
    pub rank: String,
    /// League points
    pub lp: i64,
    /// Ranked wins
    pub wins: i64,
    /// Ranked losses
    pub losses: i64,
}

/// Ranked standings for the two ranked queues.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeagueRanks {
    /// Ranked Solo/Duo entry, if placed
    pub solo: Option<LeagueEntry>,
    /// Ranked Flex entry, if placed
    pub flex: Option<LeagueEntry>,
}

/// One participant's stat line within a match.
///
/// Common fields are typed; the `challenges` object is kept as raw JSON so
/// the full per-participant challenge metrics survive reassembly untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Stable player identifier
    pub puuid: String,
    /// Champion played
    #[serde(default)]
    pub champion_name: String,
    /// Assigned position (TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY)
    #[serde(default)]
    pub team_position: String,
    /// Whether this participant's team won
    #[serde(default)]
    pub win: bool,
    /// Kills
    #[serde(default)]
    pub kills: u32,
    /// Deaths
    #[serde(default)]
    pub deaths: u32,
    /// Assists
    #[serde(default)]
    pub assists: u32,
    /// Lane minions killed
    #[serde(default)]
    pub total_minions_killed: u32,
    /// Jungle monsters killed
    #[serde(default)]
    pub neutral_minions_killed: u32,
    /// Total gold earned
    #[serde(default)]
    pub gold_earned: u32,
    /// Vision score
    #[serde(default)]
    pub vision_score: u32,
    /// Wards placed
    #[serde(default)]
    pub wards_placed: u32,
    /// Damage dealt to champions
    #[serde(default)]
    pub total_damage_dealt_to_champions: u64,
    /// Damage taken
    #[serde(default)]
    pub total_damage_taken: u64,
    /// Raw challenge metrics object, preserved as-is
    #[serde(default)]
    pub challenges: serde_json::Map<String, serde_json::Value>,
}

/// Match metadata envelope from match-v5.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    /// Canonical match id
    pub match_id: String,
}

/// Match info body from match-v5.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Numeric queue id
    #[serde(default)]
    pub queue_id: i64,
    /// Game duration in seconds
    #[serde(default)]
    pub game_duration: i64,
    /// Game creation timestamp (Unix millis)
    #[serde(default)]
    pub game_creation: i64,
    /// All ten participants
    pub participants: Vec<Participant>,
}

/// Wire shape of one match-v5 detail payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMatch {
    /// Metadata envelope
    pub metadata: MatchMetadata,
    /// Info body
    pub info: MatchInfo,
}

/// The full detail payload for one match with the requesting player's
/// participant slice merged in.
///
/// Created once per successful fetch; immutable thereafter; owned exclusively
/// by the caller once returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    /// Match handle
    pub match_id: MatchId,
    /// Numeric queue id
    pub queue_id: i64,
    /// Queue classification
    pub queue: QueueType,
    /// Game duration in seconds
    pub game_duration: i64,
    /// Game creation timestamp (Unix millis)
    pub game_creation: i64,
    /// The requesting player's stat line
    pub player: Participant,
    /// Full participant list for opponent lookups
    pub participants: Vec<Participant>,
}

impl MatchRecord {
    /// Assemble a record from a raw payload by locating the requesting
    /// player's participant slice.
    ///
    /// Returns `None` when the puuid is absent from the participant list,
    /// a deterministic payload defect that a refetch cannot repair.
    pub fn from_raw(raw: RawMatch, puuid: &str) -> Option<Self> {
        let player = raw
            .info
            .participants
            .iter()
            .find(|p| p.puuid == puuid)
            .cloned()?;

        Some(Self {
            match_id: MatchId::new(raw.metadata.match_id),
            queue_id: raw.info.queue_id,
            queue: QueueType::from_queue_id(raw.info.queue_id),
            game_duration: raw.info.game_duration,
            game_creation: raw.info.game_creation,
            player,
            participants: raw.info.participants,
        })
    }
}
