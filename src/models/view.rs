//! Derived, display-ready views produced by the projector.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use super::{Items, Kda, MatchId, Outcome, Runes, NOT_AVAILABLE};

/// Display label for a KDA line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KdaLabel {
    /// No deaths and at least one kill.
    Perfect,
    /// Precomputed ratio, rendered as `"{ratio} KDA"`.
    Ratio(f64),
    /// The player was not found in the match.
    Unavailable,
}

impl KdaLabel {
    pub fn for_kda(kda: &Kda) -> Self {
        if kda.is_perfect() {
            KdaLabel::Perfect
        } else {
            KdaLabel::Ratio(kda.ratio)
        }
    }
}

impl std::fmt::Display for KdaLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdaLabel::Perfect => write!(f, "PERFECT"),
            KdaLabel::Ratio(ratio) => write!(f, "{} KDA", ratio),
            KdaLabel::Unavailable => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

impl Serialize for KdaLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One participant as shown in a team column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub player: String,
    /// Name truncated for display, with `…` appended when cut.
    pub display_name: String,
    pub champion: String,
}

/// Participants split by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teams {
    pub team_1: Vec<TeamMember>,
    pub team_2: Vec<TeamMember>,
    /// Participants whose team id matched neither side. They appear in no team.
    pub unassigned: usize,
}

/// The searched player's view of a single match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchView {
    /// Whether the searched player appears in the match at all.
    pub player_found: bool,
    #[serde(rename = "outcomeText")]
    pub outcome: Outcome,
    pub champion: String,
    pub lane: String,
    pub duration_text: String,
    /// Spell per slot, `None` where unknown.
    pub spells: [Option<String>; 2],
    pub runes: Runes,
    pub kda: Kda,
    pub kda_label: KdaLabel,
    pub items: Items,
    #[serde(flatten)]
    pub teams: Teams,
}

/// A projected match with its identity and start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCard {
    pub id: MatchId,
    pub played_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: PlayerMatchView,
}

/// All matches played on one calendar day, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub match_count: usize,
    pub matches: Vec<MatchCard>,
}

/// The full projected history of one player, most recent day first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub player: String,
    pub days: Vec<DayView>,
}

impl HistoryView {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_matches(&self) -> usize {
        self.days.iter().map(|d| d.match_count).sum()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayView> {
        self.days.iter().find(|d| d.date == date)
    }

    /// The most recent day with matches.
    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }
}
