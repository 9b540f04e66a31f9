// Individual pick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player::PlayerId;

/// Team identifier as used in the draft order configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        TeamId(s.to_string())
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        TeamId(s)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single draft pick record. Immutable once recorded.
///
/// The pick number is authoritative for ordering; the timestamp is advisory
/// metadata from the feed and never used to reorder picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Sequential pick number (1-indexed).
    pub pick_number: u32,
    /// Team that made the pick.
    pub team: TeamId,
    /// Player taken.
    pub player: PlayerId,
    /// When the feed observed the pick.
    pub timestamp: DateTime<Utc>,
}

impl Pick {
    pub fn new(
        pick_number: u32,
        team: impl Into<TeamId>,
        player: impl Into<PlayerId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Pick {
            pick_number,
            team: team.into(),
            player: player.into(),
            timestamp,
        }
    }
}
