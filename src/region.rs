//! Region shard parsing and API host routing
//!
//! Riot splits its API across three kinds of hosts: the account host (a
//! fixed cluster), regional routing clusters for match-v5
//! (americas/asia/europe/sea), and per-shard platform hosts for
//! summoner-v4 and league-v4 (na1, euw1, ...). A [`Region`] value knows how
//! to route to each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A player-facing region shard.
///
/// Parsed case-insensitively from the shard names players know
/// ("NA", "EUW", "KR", ...).
///
/// # Examples
///
/// ```
/// use riot_match_downloader::region::Region;
///
/// let region: Region = "euw".parse().unwrap();
/// assert_eq!(region, Region::Euw);
/// assert_eq!(region.routing().host(), "europe.api.riotgames.com");
/// assert_eq!(region.platform_host(), "euw1.api.riotgames.com");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// North America
    Na,
    /// Brazil
    Br,
    /// Latin America North
    Lan,
    /// Latin America South
    Las,
    /// Korea
    Kr,
    /// Japan
    Jp,
    /// Europe West
    Euw,
    /// Europe Nordic & East
    Eune,
    /// Middle East
    Me1,
    /// Turkey
    Tr,
    /// Russia
    Ru,
    /// Oceania
    Oce,
    /// Singapore
    Sg2,
    /// Taiwan
    Tw2,
    /// Vietnam
    Vn2,
}

/// Regional routing cluster serving match-v5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingRegion {
    /// Americas cluster
    Americas,
    /// Asia cluster
    Asia,
    /// Europe cluster
    Europe,
    /// South-east Asia cluster
    Sea,
}

impl RoutingRegion {
    /// Hostname of this routing cluster.
    pub fn host(&self) -> &'static str {
        match self {
            RoutingRegion::Americas => "americas.api.riotgames.com",
            RoutingRegion::Asia => "asia.api.riotgames.com",
            RoutingRegion::Europe => "europe.api.riotgames.com",
            RoutingRegion::Sea => "sea.api.riotgames.com",
        }
    }
}

impl Region {
    /// All supported shards, in display order.
    pub const ALL: [Region; 15] = [
        Region::Na,
        Region::Euw,
        Region::Kr,
        Region::Oce,
        Region::Eune,
        Region::Lan,
        Region::Las,
        Region::Br,
        Region::Jp,
        Region::Me1,
        Region::Tr,
        Region::Ru,
        Region::Sg2,
        Region::Tw2,
        Region::Vn2,
    ];

    /// The match-v5 routing cluster for this shard.
    pub fn routing(&self) -> RoutingRegion {
        match self {
            Region::Na | Region::Br | Region::Lan | Region::Las => RoutingRegion::Americas,
            Region::Kr | Region::Jp => RoutingRegion::Asia,
            Region::Euw | Region::Eune | Region::Me1 | Region::Tr | Region::Ru => {
                RoutingRegion::Europe
            }
            Region::Oce | Region::Sg2 | Region::Tw2 | Region::Vn2 => RoutingRegion::Sea,
        }
    }

    /// Platform identifier used by summoner-v4 and league-v4 hosts.
    pub fn platform(&self) -> &'static str {
        match self {
            Region::Na => "na1",
            Region::Br => "br1",
            Region::Lan => "la1",
            Region::Las => "la2",
            Region::Kr => "kr",
            Region::Jp => "jp1",
            Region::Euw => "euw1",
            Region::Eune => "eun1",
            Region::Me1 => "me1",
            Region::Tr => "tr1",
            Region::Ru => "ru",
            Region::Oce => "oc1",
            Region::Sg2 => "sg2",
            Region::Tw2 => "tw2",
            Region::Vn2 => "vn2",
        }
    }

    /// Hostname of the platform-scoped API for this shard.
    pub fn platform_host(&self) -> String {
        format!("{}.api.riotgames.com", self.platform())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::Na => "NA",
            Region::Br => "BR",
            Region::Lan => "LAN",
            Region::Las => "LAS",
            Region::Kr => "KR",
            Region::Jp => "JP",
            Region::Euw => "EUW",
            Region::Eune => "EUNE",
            Region::Me1 => "ME1",
            Region::Tr => "TR",
            Region::Ru => "RU",
            Region::Oce => "OCE",
            Region::Sg2 => "SG2",
            Region::Tw2 => "TW2",
            Region::Vn2 => "VN2",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NA" => Ok(Region::Na),
            "BR" => Ok(Region::Br),
            "LAN" => Ok(Region::Lan),
            "LAS" => Ok(Region::Las),
            "KR" => Ok(Region::Kr),
            "JP" => Ok(Region::Jp),
            "EUW" => Ok(Region::Euw),
            "EUNE" => Ok(Region::Eune),
            "ME1" => Ok(Region::Me1),
            "TR" => Ok(Region::Tr),
            "RU" => Ok(Region::Ru),
            "OCE" => Ok(Region::Oce),
            "SG2" => Ok(Region::Sg2),
            "TW2" => Ok(Region::Tw2),
            "VN2" => Ok(Region::Vn2),
            other => Err(RegionError::UnknownShard(other.to_string())),
        }
    }
}

/// Errors that can occur during region parsing
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// Shard name not recognized
    #[error("unknown region shard: {0}")]
    UnknownShard(String),
}
