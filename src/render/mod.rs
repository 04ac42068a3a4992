//! Plain-text rendering of a player's history for the terminal.

use std::fmt::{self, Write};

use chrono::NaiveDate;

use crate::fetch::PlayerPage;
use crate::models::{DayView, HistoryView, MatchCard, Runes, TeamMember, NOT_AVAILABLE};
use crate::view_state::is_day_expanded;

/// Renders a history view as indented text.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    date_format: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

impl TextRenderer {
    /// `date_format` is a strftime pattern for day headers.
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Header, day list and the details of the expanded day.
    pub fn render(&self, page: &PlayerPage, view: &HistoryView, expanded: Option<NaiveDate>) -> String {
        let mut out = String::new();
        // Only fails on a bad date pattern, which config validation rejects.
        if let Err(e) = self.write_page(&mut out, page, view, expanded) {
            tracing::warn!("Rendering stopped early: {}", e);
        }
        out
    }

    fn write_page(
        &self,
        out: &mut String,
        page: &PlayerPage,
        view: &HistoryView,
        expanded: Option<NaiveDate>,
    ) -> fmt::Result {
        let level = page
            .profile
            .summoner_level
            .map(|l| l.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        writeln!(
            out,
            "{}  Level {}  {}  Winrate: {}",
            page.riot_id,
            level,
            page.profile.tier(),
            page.stats.winrate_label()
        )?;
        writeln!(out)?;
        writeln!(out, "Clash History")?;

        if view.is_empty() {
            writeln!(out, "No match history found.")?;
            return Ok(());
        }

        for day in &view.days {
            self.write_day(out, day, is_day_expanded(expanded, day.date))?;
        }
        Ok(())
    }

    fn write_day(&self, out: &mut String, day: &DayView, expanded: bool) -> fmt::Result {
        let marker = if expanded { "v" } else { ">" };
        writeln!(
            out,
            "{} {} ({} matches)",
            marker,
            day.date.format(&self.date_format),
            day.match_count
        )?;
        if expanded {
            for card in &day.matches {
                write_card(out, card)?;
            }
        }
        Ok(())
    }
}

fn write_card(out: &mut String, card: &MatchCard) -> fmt::Result {
    let v = &card.view;
    writeln!(
        out,
        "    {}  {}  {}  {}",
        v.outcome, v.lane, v.champion, v.duration_text
    )?;
    writeln!(
        out,
        "      {} / {} / {}  {}",
        v.kda.kills, v.kda.deaths, v.kda.assists, v.kda_label
    )?;

    let spells = match &v.spells {
        [None, None] => NOT_AVAILABLE.to_string(),
        [first, second] => format!(
            "{}, {}",
            first.as_deref().unwrap_or("-"),
            second.as_deref().unwrap_or("-")
        ),
    };
    writeln!(out, "      Spells: {}", spells)?;
    writeln!(out, "      Runes: {}", runes_text(&v.runes))?;

    let items: Vec<String> = v
        .items
        .slots()
        .iter()
        .map(|slot| slot.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()))
        .collect();
    writeln!(out, "      Items: {}", items.join(" "))?;

    writeln!(out, "      Team 1: {}", team_text(&v.teams.team_1))?;
    writeln!(out, "      Team 2: {}", team_text(&v.teams.team_2))?;
    Ok(())
}

fn runes_text(runes: &Runes) -> String {
    let part = |r: &Option<String>| r.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "{} / {}, {}",
        part(&runes.primary),
        part(&runes.keystone),
        part(&runes.secondary)
    )
}

fn team_text(members: &[TeamMember]) -> String {
    if members.is_empty() {
        return "-".to_string();
    }
    members
        .iter()
        .map(|m| format!("{} ({})", m.display_name, m.champion))
        .collect::<Vec<_>>()
        .join(", ")
}
