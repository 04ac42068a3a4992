//! Identity types: opaque match keys and Riot ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque key of a match in the history payload.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl From<String> for MatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid Player name and tag: {0:?}")]
pub struct InvalidRiotId(pub String);

/// A player's display name plus tag line, e.g. `melon#NA1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Build a Riot id from its two parts. Both are trimmed and must be non-empty.
    pub fn new(game_name: &str, tag_line: &str) -> Result<Self, InvalidRiotId> {
        let game_name = game_name.trim();
        let tag_line = tag_line.trim();
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(InvalidRiotId(format!("{}#{}", game_name, tag_line)));
        }
        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl FromStr for RiotId {
    type Err = InvalidRiotId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, tag) = s
            .rsplit_once('#')
            .ok_or_else(|| InvalidRiotId(s.to_string()))?;
        Self::new(name, tag)
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}
