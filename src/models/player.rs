//! Player profile and aggregate statistics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// Shown when the player has no ranked tier.
pub const UNRANKED: &str = "Unranked";

/// Shown when no win rate is known.
pub const NO_WINRATE: &str = "None";

/// Account profile of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub puuid: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub summoner_icon_id: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub summoner_level: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tier: Option<String>,
}

impl PlayerProfile {
    /// Ranked tier, or "Unranked".
    pub fn tier(&self) -> &str {
        self.tier
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNRANKED)
    }
}

/// Response wrapper used by the players endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub player: Option<PlayerProfile>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub error: Option<String>,
}

/// Aggregate statistics of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Games per role.
    #[serde(default, deserialize_with = "object_or_empty")]
    pub role: Map<String, Value>,

    /// Most played champions.
    #[serde(default, deserialize_with = "object_or_empty")]
    pub top_champions: Map<String, Value>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub winrate: Option<String>,
}

impl PlayerStats {
    /// Win rate for display.
    ///
    /// Upstream reports a fraction of games won, shown as a one-decimal
    /// percentage (`0.545` becomes `"54.5%"`). Non-numeric values are shown
    /// as given; a missing value is "None".
    pub fn winrate_label(&self) -> String {
        let Some(raw) = self.winrate.as_deref().map(str::trim).filter(|w| !w.is_empty()) else {
            return NO_WINRATE.to_string();
        };
        match raw.parse::<f64>() {
            Ok(fraction) if fraction.is_finite() => format!("{:.1}%", fraction * 100.0),
            _ => raw.to_string(),
        }
    }
}

fn object_or_empty<'de, D>(de: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_envelope() {
        let env: ProfileEnvelope = serde_json::from_value(json!({
            "success": true,
            "player": {
                "puuid": "abc",
                "gameName": "melon",
                "summonerIconId": 4568,
                "summonerLevel": 312,
                "tier": null
            }
        }))
        .unwrap();

        assert!(env.success);
        let player = env.player.unwrap();
        assert_eq!(player.summoner_icon_id, Some(4568));
        assert_eq!(player.summoner_level, Some(312));
        assert_eq!(player.tier(), UNRANKED);
    }

    #[test]
    fn test_profile_envelope_error() {
        let env: ProfileEnvelope =
            serde_json::from_value(json!({"success": false, "error": "Player not found"})).unwrap();
        assert!(!env.success);
        assert!(env.player.is_none());
        assert_eq!(env.error.as_deref(), Some("Player not found"));
    }

    #[test]
    fn test_stats_defaults() {
        let stats: PlayerStats = serde_json::from_value(json!({"role": "mid"})).unwrap();
        assert!(stats.role.is_empty());
        assert!(stats.top_champions.is_empty());
        assert_eq!(stats.winrate_label(), NO_WINRATE);
    }

    #[test]
    fn test_stats_numeric_winrate() {
        let stats: PlayerStats = serde_json::from_value(json!({
            "role": {"MIDDLE": 12},
            "topChampions": {"Ahri": 7},
            "winrate": 0.545
        }))
        .unwrap();
        assert_eq!(stats.role["MIDDLE"], 12);
        assert_eq!(stats.winrate_label(), "54.5%");
    }

    #[test]
    fn test_winrate_label_formats() {
        let label = |v: Value| {
            serde_json::from_value::<PlayerStats>(json!({"winrate": v}))
                .unwrap()
                .winrate_label()
        };
        assert_eq!(label(json!(1)), "100.0%");
        assert_eq!(label(json!(0)), "0.0%");
        assert_eq!(label(json!("0.25")), "25.0%");
        assert_eq!(label(json!("n/a yet")), "n/a yet");
        assert_eq!(label(json!("")), NO_WINRATE);
        assert_eq!(label(Value::Null), NO_WINRATE);
    }
}
