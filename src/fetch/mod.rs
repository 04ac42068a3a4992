//! Upstream player data: profile, aggregate stats and match history.
//!
//! Sources are plain request wrappers. They do not retry, cache or paginate.

mod file;

pub use file::JsonFileSource;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::models::{MatchHistory, PlayerProfile, PlayerStats, ProfileEnvelope, RiotId};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Player {0} does not exist")]
    PlayerNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can supply a player's profile, stats and match history.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    async fn fetch_profile(&self, id: &RiotId) -> Result<PlayerProfile, FetchError>;

    async fn fetch_stats(&self, id: &RiotId) -> Result<PlayerStats, FetchError>;

    async fn fetch_match_history(&self, id: &RiotId) -> Result<MatchHistory, FetchError>;
}

/// Everything needed to show one player.
#[derive(Debug, Clone)]
pub struct PlayerPage {
    pub riot_id: RiotId,
    pub profile: PlayerProfile,
    pub stats: PlayerStats,
    pub history: MatchHistory,
}

impl PlayerPage {
    /// Request profile, stats and history concurrently.
    ///
    /// A missing profile fails the page. Stats and history failures are
    /// logged and replaced by empty defaults.
    pub async fn load(source: &dyn PlayerSource, id: &RiotId) -> Result<Self, FetchError> {
        let (profile, stats, history) = tokio::join!(
            source.fetch_profile(id),
            source.fetch_stats(id),
            source.fetch_match_history(id),
        );

        let profile = profile?;
        let stats = stats.unwrap_or_else(|e| {
            warn!("Stats for {} unavailable from {}: {}", id, source.name(), e);
            PlayerStats::default()
        });
        let history = history.unwrap_or_else(|e| {
            warn!("Match history for {} unavailable from {}: {}", id, source.name(), e);
            MatchHistory::default()
        });

        info!("Loaded {} with {} matches", id, history.len());

        Ok(Self {
            riot_id: id.clone(),
            profile,
            stats,
            history,
        })
    }
}

/// Reads player data from the HTTP services.
pub struct HttpPlayerSource {
    client: Client,
    config: SourceConfig,
}

impl HttpPlayerSource {
    /// Create a new source with the given configuration.
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("match-history/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// `{players_url}/{name}/{tag}`, each part percent-encoded.
    pub fn profile_url(&self, id: &RiotId) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.config.players_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.config.players_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.config.players_url.clone()))?
            .pop_if_empty()
            .push(&id.game_name)
            .push(&id.tag_line);
        Ok(url)
    }

    pub fn stats_url(&self, id: &RiotId) -> Result<Url, FetchError> {
        query_url(&self.config.stats_url, id)
    }

    pub fn history_url(&self, id: &RiotId) -> Result<Url, FetchError> {
        query_url(&self.config.history_url, id)
    }

    async fn get_json(&self, url: Url) -> Result<(StatusCode, Value), FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok((status, Value::Null));
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok((status, serde_json::from_slice(&body)?))
    }
}

fn query_url(base: &str, id: &RiotId) -> Result<Url, FetchError> {
    Url::parse_with_params(
        base,
        &[
            ("gameName", id.game_name.as_str()),
            ("tagLine", id.tag_line.as_str()),
        ],
    )
    .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
}

fn not_found(status: StatusCode, id: &RiotId) -> Result<(), FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::PlayerNotFound(id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl PlayerSource for HttpPlayerSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_profile(&self, id: &RiotId) -> Result<PlayerProfile, FetchError> {
        let (status, body) = self.get_json(self.profile_url(id)?).await?;
        not_found(status, id)?;

        let envelope: ProfileEnvelope = serde_json::from_value(body)?;
        match envelope.player {
            Some(profile) if envelope.success => Ok(profile),
            _ => {
                if let Some(error) = envelope.error {
                    warn!("Profile lookup for {} failed: {}", id, error);
                }
                Err(FetchError::PlayerNotFound(id.to_string()))
            }
        }
    }

    async fn fetch_stats(&self, id: &RiotId) -> Result<PlayerStats, FetchError> {
        let (status, body) = self.get_json(self.stats_url(id)?).await?;
        not_found(status, id)?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_match_history(&self, id: &RiotId) -> Result<MatchHistory, FetchError> {
        let (status, body) = self.get_json(self.history_url(id)?).await?;
        not_found(status, id)?;
        Ok(MatchHistory::from_json(body))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{MatchId, RawMatch};

    /// In-memory source for tests.
    #[derive(Default)]
    pub(crate) struct MockSource {
        pub profile: Option<PlayerProfile>,
        pub stats: Option<PlayerStats>,
        pub history: Option<MatchHistory>,
    }

    #[async_trait]
    impl PlayerSource for MockSource {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn fetch_profile(&self, id: &RiotId) -> Result<PlayerProfile, FetchError> {
            self.profile
                .clone()
                .ok_or_else(|| FetchError::PlayerNotFound(id.to_string()))
        }

        async fn fetch_stats(&self, _id: &RiotId) -> Result<PlayerStats, FetchError> {
            self.stats.clone().ok_or(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }

        async fn fetch_match_history(&self, _id: &RiotId) -> Result<MatchHistory, FetchError> {
            self.history.clone().ok_or(FetchError::HttpStatus {
                status: 502,
                message: "Bad Gateway".to_string(),
            })
        }
    }

    fn melon() -> RiotId {
        RiotId::new("melon", "NA1").unwrap()
    }

    fn http_source() -> HttpPlayerSource {
        HttpPlayerSource::new(SourceConfig {
            players_url: "http://localhost:5001/api/players/".to_string(),
            stats_url: "https://stats.example.com/prod/player/stat".to_string(),
            history_url: "https://stats.example.com/prod/match-history".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_profile_url_encodes_parts() {
        let id = RiotId::new("Hide on bush", "KR 1").unwrap();
        let url = http_source().profile_url(&id).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5001/api/players/Hide%20on%20bush/KR%201"
        );
    }

    #[test]
    fn test_query_urls() {
        let source = http_source();
        assert_eq!(
            source.history_url(&melon()).unwrap().as_str(),
            "https://stats.example.com/prod/match-history?gameName=melon&tagLine=NA1"
        );
        assert_eq!(
            source.stats_url(&melon()).unwrap().as_str(),
            "https://stats.example.com/prod/player/stat?gameName=melon&tagLine=NA1"
        );
    }

    #[test]
    fn test_query_url_rejects_bad_base() {
        assert!(matches!(
            query_url("not a url", &melon()),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_load_page_degrades_stats_and_history() {
        let source = MockSource {
            profile: Some(PlayerProfile {
                summoner_level: Some(30),
                ..PlayerProfile::default()
            }),
            ..MockSource::default()
        };

        let page = PlayerPage::load(&source, &melon()).await.unwrap();
        assert_eq!(page.profile.summoner_level, Some(30));
        assert_eq!(page.stats, PlayerStats::default());
        assert!(page.history.is_empty());
    }

    #[tokio::test]
    async fn test_load_page_requires_profile() {
        let source = MockSource {
            history: Some(MatchHistory::new()),
            ..MockSource::default()
        };
        let err = PlayerPage::load(&source, &melon()).await.unwrap_err();
        assert!(matches!(err, FetchError::PlayerNotFound(ref who) if who == "melon#NA1"));
    }

    #[tokio::test]
    async fn test_load_page_keeps_history() {
        let history: MatchHistory = [(MatchId::from("NA1_1"), RawMatch::default())]
            .into_iter()
            .collect();
        let source = MockSource {
            profile: Some(PlayerProfile::default()),
            stats: Some(PlayerStats::default()),
            history: Some(history),
        };
        let page = PlayerPage::load(&source, &melon()).await.unwrap();
        assert_eq!(page.history.len(), 1);
        assert_eq!(page.riot_id, melon());
    }
}
