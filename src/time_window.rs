//! Time-window helpers for summary periods.
//!
//! Summaries carry auspicious/inauspicious periods as loosely formatted
//! start and end strings ("10:30", "2:15 PM", full RFC 3339 timestamps).
//! These helpers parse them into clock times, render them for display and
//! answer whether a given moment falls inside the window.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const CLOCK_FORMATS: [&str; 6] = [
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M%p",
    "%I %p",
];

/// How clock times are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    #[default]
    TwentyFourHour,
    TwelveHour,
}

impl TimeFormat {
    fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "%H:%M",
            TimeFormat::TwelveHour => "%-I:%M %p",
        }
    }

    pub fn render(&self, t: NaiveTime) -> String {
        t.format(self.pattern()).to_string()
    }
}

/// Parse a clock time from the formats the summary API produces.
///
/// Timestamps keep the time of day in their own offset.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let upper = s.to_uppercase();
    for pattern in CLOCK_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(&upper, pattern) {
            return Some(t);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.time());
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|dt| dt.time())
}

/// A daily window between two clock times. May wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(parse_clock(start)?, parse_clock(end)?))
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Start inclusive, end exclusive. An equal start and end is empty.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start == self.end {
            false
        } else if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            t >= self.start && t < self.end
        }
    }

    pub fn duration(&self) -> Duration {
        let span = self.end.signed_duration_since(self.start);
        if self.wraps_midnight() {
            span + Duration::hours(24)
        } else {
            span
        }
    }

    pub fn format(&self, format: TimeFormat) -> String {
        format!("{} - {}", format.render(self.start), format.render(self.end))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(TimeFormat::TwentyFourHour))
    }
}

/// Render a window from optional start/end strings.
///
/// Unparseable ends are treated as missing; with neither end usable there
/// is nothing to show.
pub fn format_time_window(
    start: Option<&str>,
    end: Option<&str>,
    format: TimeFormat,
) -> Option<String> {
    let start = start.and_then(parse_clock);
    let end = end.and_then(parse_clock);

    match (start, end) {
        (Some(s), Some(e)) => Some(TimeWindow::new(s, e).format(format)),
        (Some(s), None) => Some(format!("from {}", format.render(s))),
        (None, Some(e)) => Some(format!("until {}", format.render(e))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_clock_formats() {
        assert_eq!(parse_clock("10:30"), Some(hm(10, 30)));
        assert_eq!(parse_clock("07:05:00"), Some(hm(7, 5)));
        assert_eq!(parse_clock("2:15 pm"), Some(hm(14, 15)));
        assert_eq!(parse_clock("12:00 AM"), Some(hm(0, 0)));
        assert_eq!(parse_clock("2024-05-01T06:45:00+05:30"), Some(hm(6, 45)));
        assert_eq!(parse_clock("2024-05-01 18:20:00"), Some(hm(18, 20)));
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("soon"), None);
        assert_eq!(parse_clock("25:00"), None);
    }

    #[test]
    fn test_contains_regular_window() {
        let w = TimeWindow::new(hm(10, 30), hm(12, 0));
        assert!(w.contains(hm(10, 30)));
        assert!(w.contains(hm(11, 59)));
        assert!(!w.contains(hm(12, 0)));
        assert!(!w.contains(hm(9, 0)));
    }

    #[test]
    fn test_contains_wrapping_window() {
        let w = TimeWindow::new(hm(22, 0), hm(2, 0));
        assert!(w.wraps_midnight());
        assert!(w.contains(hm(23, 30)));
        assert!(w.contains(hm(1, 0)));
        assert!(!w.contains(hm(2, 0)));
        assert!(!w.contains(hm(12, 0)));
        assert_eq!(w.duration(), Duration::hours(4));
    }

    #[test]
    fn test_empty_window() {
        let w = TimeWindow::new(hm(9, 0), hm(9, 0));
        assert!(!w.contains(hm(9, 0)));
        assert_eq!(w.duration(), Duration::zero());
    }

    #[test]
    fn test_duration() {
        let w = TimeWindow::parse("10:30", "12:00").unwrap();
        assert_eq!(w.duration(), Duration::minutes(90));
    }

    #[test]
    fn test_format_time_window() {
        assert_eq!(
            format_time_window(Some("10:30"), Some("12:00"), TimeFormat::TwentyFourHour),
            Some("10:30 - 12:00".to_string())
        );
        assert_eq!(
            format_time_window(Some("10:30"), Some("14:05"), TimeFormat::TwelveHour),
            Some("10:30 AM - 2:05 PM".to_string())
        );
        assert_eq!(
            format_time_window(Some("06:00"), None, TimeFormat::TwentyFourHour),
            Some("from 06:00".to_string())
        );
        assert_eq!(
            format_time_window(Some("later"), Some("18:00"), TimeFormat::TwentyFourHour),
            Some("until 18:00".to_string())
        );
        assert_eq!(format_time_window(None, None, TimeFormat::TwentyFourHour), None);
    }

    #[test]
    fn test_display_uses_24_hour() {
        let w = TimeWindow::new(hm(8, 5), hm(9, 40));
        assert_eq!(w.to_string(), "08:05 - 09:40");
    }
}
