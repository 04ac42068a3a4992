//! Time handling: timestamp normalization, duration text, day grouping.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{FormatError, ViewerZone};
use crate::models::{MatchHistory, MatchId, RawMatch};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Turn a `gameCreation` string into a point in time.
///
/// Zone-less values (`2024-05-01 18:30:00`) are read in the viewer's zone.
/// Missing or unparseable input yields the Unix epoch, so such matches order
/// as the oldest.
pub fn normalize_timestamp(raw: Option<&str>, zone: &ViewerZone) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DateTime::UNIX_EPOCH;
    };
    let iso = raw.replacen(' ', "T", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&iso) {
        return dt.with_timezone(&Utc);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&iso, format) {
            return zone.to_utc(&naive).unwrap_or(DateTime::UNIX_EPOCH);
        }
    }

    // A bare date is midnight UTC.
    if let Ok(date) = NaiveDate::parse_from_str(&iso, "%Y-%m-%d") {
        return date.and_time(chrono::NaiveTime::MIN).and_utc();
    }

    DateTime::UNIX_EPOCH
}

/// Render `"MM:SS"` as `"{m}min {s}sec"`.
pub fn format_duration(raw: &str) -> Result<String, FormatError> {
    let malformed = || FormatError::MalformedDuration(raw.to_string());

    let mut parts = raw.split(':');
    let (Some(minutes), Some(seconds), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let minutes: u64 = minutes.trim().parse().map_err(|_| malformed())?;
    let seconds: u64 = seconds.trim().parse().map_err(|_| malformed())?;

    Ok(format!("{}min {}sec", minutes, seconds))
}

/// A match paired with its normalized start time.
#[derive(Debug, Clone, Copy)]
pub struct TimedMatch<'a> {
    pub id: &'a MatchId,
    pub raw: &'a RawMatch,
    pub played_at: DateTime<Utc>,
}

/// Matches played on one calendar day of the viewer's zone.
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub matches: Vec<TimedMatch<'a>>,
}

/// Bucket matches by local calendar day.
///
/// Days are ordered most recent first, and so are the matches within a day.
/// Matches that start at the same instant keep ascending match-id order.
pub fn group_by_day<'a>(history: &'a MatchHistory, zone: &ViewerZone) -> Vec<DayGroup<'a>> {
    let mut timed: Vec<TimedMatch<'a>> = history
        .iter()
        .map(|(id, raw)| TimedMatch {
            id,
            raw,
            played_at: normalize_timestamp(raw.game_creation.as_deref(), zone),
        })
        .collect();

    // Sort the whole sequence first; grouping keeps this order within each day.
    timed.sort_by(|a, b| b.played_at.cmp(&a.played_at));

    let mut by_day: BTreeMap<NaiveDate, Vec<TimedMatch<'a>>> = BTreeMap::new();
    for m in timed {
        by_day.entry(zone.date_of(&m.played_at)).or_default().push(m);
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, matches)| DayGroup { date, matches })
        .collect()
}
