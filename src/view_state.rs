//! Which day of the history is expanded.
//!
//! At most one day is open at a time. The state belongs to the presentation
//! layer; renderers only consult [`is_day_expanded`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `true` if `day` is the expanded day.
pub fn is_day_expanded(expanded: Option<NaiveDate>, day: NaiveDate) -> bool {
    expanded == Some(day)
}

/// Expand/collapse toggle over day groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayToggle {
    expanded: Option<NaiveDate>,
}

impl DayToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `day` expanded.
    pub fn expanded_on(day: NaiveDate) -> Self {
        Self {
            expanded: Some(day),
        }
    }

    pub fn expanded(&self) -> Option<NaiveDate> {
        self.expanded
    }

    /// Collapse `day` if it is open, otherwise open it and close any other day.
    pub fn toggle(&mut self, day: NaiveDate) {
        self.expanded = if self.expanded == Some(day) {
            None
        } else {
            Some(day)
        };
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn is_expanded(&self, day: NaiveDate) -> bool {
        is_day_expanded(self.expanded, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_starts_collapsed() {
        let toggle = DayToggle::new();
        assert_eq!(toggle.expanded(), None);
        assert!(!toggle.is_expanded(day(1)));
    }

    #[test]
    fn test_toggle_same_day_collapses() {
        let mut toggle = DayToggle::new();
        toggle.toggle(day(1));
        assert!(toggle.is_expanded(day(1)));
        toggle.toggle(day(1));
        assert_eq!(toggle.expanded(), None);
    }

    #[test]
    fn test_toggle_other_day_switches() {
        let mut toggle = DayToggle::expanded_on(day(1));
        toggle.toggle(day(2));
        assert!(toggle.is_expanded(day(2)));
        assert!(!toggle.is_expanded(day(1)));
    }

    #[test]
    fn test_collapse() {
        let mut toggle = DayToggle::expanded_on(day(3));
        toggle.collapse();
        assert_eq!(toggle, DayToggle::new());
    }

    #[test]
    fn test_predicate() {
        assert!(is_day_expanded(Some(day(4)), day(4)));
        assert!(!is_day_expanded(Some(day(4)), day(5)));
        assert!(!is_day_expanded(None, day(4)));
    }
}
