//! Match-history projection engine.
//!
//! Turns a raw match collection into a display-ready structure for one player:
//! - Timestamp normalization and duration text
//! - Calendar-day grouping, most recent first
//! - The searched player's flattened view of each match
//! - The two-team split used for side-by-side display
//!
//! Everything here is pure and synchronous. Malformed input degrades to
//! sentinel values; the only error type is [`FormatError`], which callers
//! recover from by showing the raw string.

mod player_view;
mod timeline;

pub use player_view::{project_match, split_teams, truncate_name};
pub use timeline::{format_duration, group_by_day, normalize_timestamp, DayGroup, TimedMatch};

use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Utc,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{DayView, HistoryView, MatchCard, MatchHistory, PlayerMatchView, RawMatch, Teams};

/// Longest team-member name shown before truncation.
pub const DEFAULT_NAME_WIDTH: usize = 10;

/// Errors from formatting raw match fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Malformed duration {0:?}, expected MM:SS")]
    MalformedDuration(String),
}

/// The time zone used for reading zone-less timestamps and for day keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// The zone of the machine running the projector.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ViewerZone {
    pub fn utc() -> Self {
        ViewerZone::Fixed(Utc.fix())
    }

    /// A fixed offset east of UTC. `None` if out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(ViewerZone::Fixed)
    }

    /// Interpret a wall-clock time in this zone.
    pub fn to_utc(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            ViewerZone::Local => wall_clock_to_utc(&Local, naive),
            ViewerZone::Fixed(offset) => wall_clock_to_utc(offset, naive),
        }
    }

    /// Calendar date of an instant in this zone.
    pub fn date_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        match self {
            ViewerZone::Local => instant.with_timezone(&Local).date_naive(),
            ViewerZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

/// Resolve a wall-clock time in `tz`.
///
/// An ambiguous time (clocks turned back) takes the earlier instant. A time
/// skipped by a forward transition keeps the offset in force before the
/// transition, so it lands after the gap: 02:30 on a spring-forward night in
/// New York reads as 03:30 daylight time.
pub fn wall_clock_to_utc<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let before = naive.checked_sub_signed(Duration::days(1))?;
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = naive
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
            Some(utc.and_utc())
        }
    }
}

/// Projector settings: viewer zone and team-name width.
#[derive(Debug, Clone)]
pub struct HistoryProjector {
    zone: ViewerZone,
    name_width: usize,
}

impl Default for HistoryProjector {
    fn default() -> Self {
        Self::new(ViewerZone::default())
    }
}

impl HistoryProjector {
    pub fn new(zone: ViewerZone) -> Self {
        Self {
            zone,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }

    /// Builder method to set the team-name display width.
    pub fn with_name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    pub fn zone(&self) -> &ViewerZone {
        &self.zone
    }

    pub fn name_width(&self) -> usize {
        self.name_width
    }

    pub fn group_by_day<'a>(&self, history: &'a MatchHistory) -> Vec<DayGroup<'a>> {
        group_by_day(history, &self.zone)
    }

    pub fn project_match(&self, raw: &RawMatch, player: &str) -> PlayerMatchView {
        project_match(raw, player, self.name_width)
    }

    pub fn partition_teams(&self, raw: &RawMatch) -> Teams {
        split_teams(raw, self.name_width)
    }

    /// Run the full pipeline: group, order, and project every match for `player`.
    pub fn project(&self, history: &MatchHistory, player: &str) -> HistoryView {
        let days: Vec<DayView> = self
            .group_by_day(history)
            .into_iter()
            .map(|group| DayView {
                date: group.date,
                match_count: group.matches.len(),
                matches: group
                    .matches
                    .iter()
                    .map(|m| MatchCard {
                        id: m.id.clone(),
                        played_at: m.played_at,
                        view: self.project_match(m.raw, player),
                    })
                    .collect(),
            })
            .collect();

        let view = HistoryView {
            player: player.to_string(),
            days,
        };

        let missing = view
            .days
            .iter()
            .flat_map(|d| d.matches.iter())
            .filter(|m| !m.view.player_found)
            .count();
        if missing > 0 {
            info!(
                "{} of {} matches do not include player {:?}",
                missing,
                view.total_matches(),
                player
            );
        }
        debug!(
            "Projected {} matches into {} days for {:?}",
            view.total_matches(),
            view.days.len(),
            player
        );

        view
    }
}

/// Project one match for `player` with the default name width.
pub fn project_for_player(raw: &RawMatch, player: &str) -> PlayerMatchView {
    project_match(raw, player, DEFAULT_NAME_WIDTH)
}

/// Split a match into its two teams with the default name width.
pub fn partition_teams(raw: &RawMatch) -> Teams {
    split_teams(raw, DEFAULT_NAME_WIDTH)
}
