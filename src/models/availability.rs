//! Recurring weekly availability.
//!
//! A provider publishes exactly seven [`DayAvailability`] entries, ordered
//! Sunday through Saturday. The week is replaced wholesale, never patched.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Canonical day order for a stored week: Sunday first.
pub const DAY_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Minutes in a day. `end == 1440` represents midnight at the end of the day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Parse an `"HH:MM"` time-of-day string into minutes since midnight.
///
/// `"24:00"` is accepted as the end-of-day sentinel (1440 minutes).
pub fn parse_time_of_day(s: &str) -> Result<u16, String> {
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid time '{}', expected HH:MM", s))?;
    let hours: u16 = h
        .parse()
        .map_err(|_| format!("invalid hours in time '{}'", s))?;
    let minutes: u16 = m
        .parse()
        .map_err(|_| format!("invalid minutes in time '{}'", s))?;
    if minutes >= 60 {
        return Err(format!("invalid minutes in time '{}'", s));
    }
    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return Err(format!("time '{}' is past end of day", s));
    }
    Ok(total)
}

/// Format minutes since midnight as `"HH:MM"`.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A half-open `[start, end)` window within a day, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` lies fully inside this range.
    pub fn contains(&self, start: u16, end: u16) -> bool {
        self.start <= start && end <= self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

/// One weekday's opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day: Weekday,
    pub is_open: bool,
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
}

impl DayAvailability {
    /// A closed day with no ranges.
    pub fn closed(day: Weekday) -> Self {
        Self {
            day,
            is_open: false,
            ranges: vec![],
        }
    }

    /// An open day with the given ranges.
    pub fn open(day: Weekday, ranges: Vec<TimeRange>) -> Self {
        Self {
            day,
            is_open: true,
            ranges,
        }
    }
}

/// A provider's full week, Sunday through Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWeek {
    pub days: Vec<DayAvailability>,
}

impl AvailabilityWeek {
    /// Default all-closed week, returned when a provider has not published
    /// availability yet.
    pub fn all_closed() -> Self {
        Self {
            days: DAY_ORDER.iter().map(|d| DayAvailability::closed(*d)).collect(),
        }
    }

    /// Look up the entry for a weekday.
    pub fn day(&self, weekday: Weekday) -> &DayAvailability {
        // Invariant: a validated week always holds all seven days in order.
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    /// Structural validation: seven entries in canonical Sunday-first order,
    /// open days have ranges, every range is well-formed.
    pub fn validate(&self) -> Result<(), String> {
        if self.days.len() != 7 {
            return Err(format!(
                "availability must have exactly 7 days, got {}",
                self.days.len()
            ));
        }
        for (entry, expected) in self.days.iter().zip(DAY_ORDER.iter()) {
            if entry.day != *expected {
                return Err(format!(
                    "days must be ordered Sunday through Saturday, found {} where {} expected",
                    entry.day, expected
                ));
            }
            if entry.is_open && entry.ranges.is_empty() {
                return Err(format!("{} is open but has no time ranges", entry.day));
            }
            for range in &entry.ranges {
                if range.end <= range.start {
                    return Err(format!(
                        "invalid range {} on {}: end must be after start",
                        range, entry.day
                    ));
                }
                if range.end > MINUTES_PER_DAY {
                    return Err(format!("range {} on {} is past end of day", range, entry.day));
                }
            }
        }
        Ok(())
    }
}
