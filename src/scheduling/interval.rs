//! Half-open time-of-day intervals and the overlap predicate.
//!
//! This is the single source of truth for "do two bookings collide". Slot
//! generation, booking creation, and reschedule all call into this module;
//! divergent overlap logic between those call sites is the primary bug class
//! this design avoids.

use serde::{Deserialize, Serialize};

use crate::models::availability::format_minutes;

/// A half-open `[start, end)` interval in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u16,
    pub end: u16,
}

impl Interval {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: touching endpoints do not conflict.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

/// First existing interval that overlaps the candidate, if any.
pub fn find_conflict(candidate: Interval, existing: &[Interval]) -> Option<Interval> {
    existing.iter().copied().find(|e| candidate.overlaps(e))
}
