use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{FetchError, PlayerSource};
use crate::models::{MatchHistory, PlayerProfile, PlayerStats, ProfileEnvelope, RiotId};

/// Reads saved responses from a directory.
///
/// Expects `profile.json`, `stats.json` and `history.json`. A subdirectory
/// named `{game_name}#{tag_line}` takes precedence when present, so one
/// directory can hold several players.
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn player_dir(&self, id: &RiotId) -> PathBuf {
        let nested = self.dir.join(id.to_string());
        if nested.is_dir() {
            nested
        } else {
            self.dir.clone()
        }
    }

    async fn read_json(&self, id: &RiotId, file: &str) -> Result<Value, FetchError> {
        let path = self.player_dir(id).join(file);
        debug!("Reading {}", path.display());
        let contents = tokio::fs::read(&path).await?;
        Ok(serde_json::from_slice(&contents)?)
    }
}

#[async_trait]
impl PlayerSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_profile(&self, id: &RiotId) -> Result<PlayerProfile, FetchError> {
        let value = match self.read_json(id, "profile.json").await {
            Ok(value) => value,
            Err(FetchError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::PlayerNotFound(id.to_string()));
            }
            Err(e) => return Err(e),
        };

        // Either the players-endpoint envelope or a bare profile.
        if value.get("success").is_some() {
            let envelope: ProfileEnvelope = serde_json::from_value(value)?;
            return match envelope.player {
                Some(profile) if envelope.success => Ok(profile),
                _ => Err(FetchError::PlayerNotFound(id.to_string())),
            };
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn fetch_stats(&self, id: &RiotId) -> Result<PlayerStats, FetchError> {
        Ok(serde_json::from_value(self.read_json(id, "stats.json").await?)?)
    }

    async fn fetch_match_history(&self, id: &RiotId) -> Result<MatchHistory, FetchError> {
        Ok(MatchHistory::from_json(
            self.read_json(id, "history.json").await?,
        ))
    }
}
