//! Per-player projection of a single match and the team split.

use tracing::debug;

use super::timeline::format_duration;
use crate::models::{
    Items, Kda, KdaLabel, Outcome, PlayerMatchView, RawMatch, Runes, TeamMember, Teams,
    NOT_AVAILABLE, TEAM_1_ID, TEAM_2_ID,
};

/// Shorten a name to `width` characters, appending `…` when cut.
pub fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let mut short: String = name.chars().take(width).collect();
        short.push('…');
        short
    } else {
        name.to_string()
    }
}

/// Split participants into the two sides, preserving their order.
///
/// Participants with a missing or unknown team id land in neither team and
/// are only counted in [`Teams::unassigned`].
pub fn split_teams(raw: &RawMatch, name_width: usize) -> Teams {
    let mut teams = Teams::default();

    for p in &raw.participants {
        let member = TeamMember {
            player: p.player_name().to_string(),
            display_name: truncate_name(p.player_name(), name_width),
            champion: p.champion().to_string(),
        };
        match p.team_id {
            Some(TEAM_1_ID) => teams.team_1.push(member),
            Some(TEAM_2_ID) => teams.team_2.push(member),
            _ => teams.unassigned += 1,
        }
    }

    if teams.unassigned > 0 {
        debug!(
            "{} participant(s) without a recognized team id",
            teams.unassigned
        );
    }

    teams
}

/// Build `player`'s view of one match.
///
/// Player-derived fields fall back to "N/A" or empty values when the player is
/// not a participant. Duration and teams come from the match itself.
pub fn project_match(raw: &RawMatch, player: &str, name_width: usize) -> PlayerMatchView {
    let duration_text = match raw.game_duration.as_deref() {
        Some(d) => format_duration(d).unwrap_or_else(|e| {
            debug!("{}; showing raw value", e);
            d.to_string()
        }),
        None => NOT_AVAILABLE.to_string(),
    };
    let teams = split_teams(raw, name_width);

    match raw.participant(player) {
        Some(p) => {
            let kda = p.kda();
            PlayerMatchView {
                player_found: true,
                outcome: p.outcome(),
                champion: p.champion().to_string(),
                lane: p.lane().to_string(),
                duration_text,
                spells: p.spells(),
                runes: p.runes(),
                kda_label: KdaLabel::for_kda(&kda),
                kda,
                items: p.items(),
                teams,
            }
        }
        None => PlayerMatchView {
            player_found: false,
            outcome: Outcome::Defeat,
            champion: NOT_AVAILABLE.to_string(),
            lane: NOT_AVAILABLE.to_string(),
            duration_text,
            spells: [None, None],
            runes: Runes::default(),
            kda: Kda::default(),
            kda_label: KdaLabel::Unavailable,
            items: Items::default(),
            teams,
        },
    }
}
