//! Bounded LRU cache of completed fetch sessions
//!
//! Refetching 100 matches costs minutes of rate-limit budget, so completed
//! sessions are cached per user and revalidated cheaply: if the newest
//! remote match ID still equals the newest cached one, the player has not
//! played since and the cached records are current. The cache is an explicit
//! object handed to callers, not ambient global state, and is bounded by a
//! fixed user capacity with LRU eviction.

use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::region::Region;
use crate::{MatchId, MatchRecord};

/// Default maximum number of cached users.
pub const DEFAULT_MAX_USERS: usize = 5;

/// Cache key: one player on one shard.
///
/// Rendered as `game_name#tag_line#REGION`, matching how players write
/// their Riot IDs.
pub fn user_key(game_name: &str, tag_line: &str, region: Region) -> String {
    format!("{game_name}#{tag_line}#{region}")
}

/// One cached session's results.
#[derive(Debug, Clone)]
pub struct CachedSession {
    /// Resolved puuid for the cached user
    pub puuid: String,
    /// Records fetched by the cached session, newest first
    pub matches: Vec<MatchRecord>,
    /// IDs the cached session abandoned
    pub failed: Vec<MatchId>,
    /// When the entry was stored
    pub cached_at: Instant,
}

impl CachedSession {
    /// The newest cached match ID, if any matches were fetched.
    pub fn newest_match_id(&self) -> Option<&MatchId> {
        self.matches.first().map(|record| &record.match_id)
    }

    /// Whether the cached records are still current given the newest match
    /// ID the remote service reports for this player.
    pub fn is_fresh(&self, latest_remote: &MatchId) -> bool {
        self.newest_match_id() == Some(latest_remote)
    }
}

/// Bounded in-process cache of completed sessions, keyed by user.
///
/// At capacity, inserting a new user evicts the least recently used entry.
pub struct SessionCache {
    max_users: usize,
    entries: HashMap<String, CachedSession>,
    access_order: Vec<String>,
}

impl SessionCache {
    /// Create a cache bounded to `max_users` entries.
    pub fn new(max_users: usize) -> Self {
        Self {
            max_users,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Store a completed session for a user, evicting the LRU entry at
    /// capacity.
    pub fn insert(&mut self, key: impl Into<String>, session: CachedSession) {
        let key = key.into();

        if self.entries.len() >= self.max_users && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        self.touch(&key);
        debug!(key = %key, matches = session.matches.len(), "Caching session");
        self.entries.insert(key, session);
    }

    /// Look up a cached session, marking the entry as recently used.
    pub fn get(&mut self, key: &str) -> Option<&CachedSession> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    /// Number of cached users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached sessions.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.to_string());
    }

    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.first().cloned() {
            debug!(key = %key, "Evicting LRU cached session");
            self.entries.remove(&key);
            self.access_order.remove(0);
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_USERS)
    }
}
