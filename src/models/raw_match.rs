//! Raw match records as delivered by the match-history service.
//!
//! Every field is optional and type-tolerant; see [`super::lenient`]. Typed
//! accessors on [`Participant`] supply each field's documented default.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::lenient::{self, value_as_string};
use super::MatchId;

/// Fallback text for any field that cannot be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Team id of the first side of a match.
pub const TEAM_1_ID: u32 = 100;

/// Team id of the second side of a match.
pub const TEAM_2_ID: u32 = 200;

/// One match as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    /// Start time, `YYYY-MM-DD HH:MM:SS` without a zone.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub game_creation: Option<String>,

    /// Length of the game as `MM:SS`.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub game_duration: Option<String>,

    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub participants: Vec<Participant>,
}

impl RawMatch {
    /// Find the participant whose display name equals `player` exactly.
    pub fn participant(&self, player: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.player.as_deref() == Some(player))
    }
}

/// Win/loss from the searched player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    /// `1` or `"1"` is a victory. Everything else, including a missing value, is a defeat.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Number(n)) if n.as_f64() == Some(1.0) => Outcome::Victory,
            Some(Value::String(s)) if s == "1" => Outcome::Victory,
            _ => Outcome::Defeat,
        }
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Victory => write!(f, "Victory"),
            Outcome::Defeat => write!(f, "Defeat"),
        }
    }
}

/// One player's record within a match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub player: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub team_id: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub champion: Option<String>,

    /// Encoded as a number or a string upstream.
    #[serde(default, deserialize_with = "lenient::opt_scalar")]
    pub outcome: Option<Value>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lane: Option<String>,

    #[serde(default)]
    pub summoner_spells: SummonerSpells,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub runes: Option<Runes>,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub kda: Option<Kda>,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub items: Option<Items>,
}

impl Participant {
    /// Display name, or `"N/A"`.
    pub fn player_name(&self) -> &str {
        self.player.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Champion identifier, or `"N/A"`.
    pub fn champion(&self) -> &str {
        self.champion.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Lane label, or `"N/A"`.
    pub fn lane(&self) -> &str {
        self.lane.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_raw(self.outcome.as_ref())
    }

    /// Spell identifiers by slot; a slot is `None` when unknown.
    pub fn spells(&self) -> [Option<String>; 2] {
        self.summoner_spells.slots()
    }

    /// Rune identifiers; every slot absent when unknown.
    pub fn runes(&self) -> Runes {
        self.runes.clone().unwrap_or_default()
    }

    /// Kill/death/assist line; all zeros when unknown.
    pub fn kda(&self) -> Kda {
        self.kda.clone().unwrap_or_default()
    }

    /// Item slots; every slot absent when unknown.
    pub fn items(&self) -> Items {
        self.items.clone().unwrap_or_default()
    }
}

/// The two summoner spells of a participant.
///
/// Accepts `[{"0": a, "1": b}]`, `{"0": a, "1": b}` or `[a, b]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummonerSpells {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl SummonerSpells {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => match items.first() {
                Some(inner @ Value::Object(_)) => Self::from_value(inner),
                _ => Self {
                    first: items.first().and_then(value_as_string),
                    second: items.get(1).and_then(value_as_string),
                },
            },
            Value::Object(map) => Self {
                first: map.get("0").and_then(value_as_string),
                second: map.get("1").and_then(value_as_string),
            },
            _ => Self::default(),
        }
    }

    /// Both slots in position order. A missing first spell does not shift the second.
    pub fn slots(&self) -> [Option<String>; 2] {
        [self.first.clone(), self.second.clone()]
    }
}

impl<'de> Deserialize<'de> for SummonerSpells {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(Self::from_value(&value))
    }
}

/// Rune tree and keystone identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runes {
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub keystone: Option<String>,
}

/// Kills, deaths, assists and the precomputed ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kda {
    #[serde(deserialize_with = "lenient::u32_or_zero")]
    pub kills: u32,

    #[serde(deserialize_with = "lenient::u32_or_zero")]
    pub deaths: u32,

    #[serde(deserialize_with = "lenient::u32_or_zero")]
    pub assists: u32,

    #[serde(rename = "kda", deserialize_with = "lenient::f64_or_zero")]
    pub ratio: f64,
}

impl Kda {
    /// A deathless game with at least one kill.
    pub fn is_perfect(&self) -> bool {
        self.deaths == 0 && self.kills > 0
    }
}

/// Seven item slots, `item0`..`item6`. `0` means an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Items {
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item0: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item1: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item2: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item3: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item4: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item5: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub item6: Option<u32>,
}

impl Items {
    pub const SLOTS: usize = 7;

    /// Slots in order, with empty (`0`) and unknown slots as `None`.
    pub fn slots(&self) -> [Option<u32>; Self::SLOTS] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
        .map(|slot| slot.filter(|&id| id != 0))
    }

    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(Option::is_none)
    }
}

/// Every match of one player, keyed by match id.
///
/// Backed by an ordered map so iteration never depends on the payload's key
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchHistory {
    matches: BTreeMap<MatchId, RawMatch>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a history payload: an object keyed by match id, an array, or null.
    pub fn from_json(value: Value) -> Self {
        let entries: Vec<(MatchId, Value)> = match value {
            Value::Object(map) => map.into_iter().map(|(k, v)| (MatchId::from(k), v)).collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (MatchId::from(i.to_string()), v))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                warn!("Ignoring match history payload of unexpected type: {}", other);
                Vec::new()
            }
        };

        let mut history = Self::new();
        for (id, raw) in entries {
            if !raw.is_object() {
                warn!("Skipping match {}: record is not an object", id);
                continue;
            }
            match serde_json::from_value::<RawMatch>(raw) {
                Ok(m) => history.insert(id, m),
                Err(e) => warn!("Skipping match {}: {}", id, e),
            }
        }
        history
    }

    pub fn insert(&mut self, id: MatchId, raw: RawMatch) {
        self.matches.insert(id, raw);
    }

    pub fn get(&self, id: &MatchId) -> Option<&RawMatch> {
        self.matches.get(id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MatchId, &RawMatch)> {
        self.matches.iter()
    }
}

impl FromIterator<(MatchId, RawMatch)> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = (MatchId, RawMatch)>>(iter: I) -> Self {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for MatchHistory {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(Self::from_json(value))
    }
}
