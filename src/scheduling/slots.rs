//! Candidate slot generation for a provider's day.

use crate::models::availability::DayAvailability;

use super::interval::{find_conflict, Interval};

/// Default slot length in minutes.
pub const DEFAULT_SLOT_DURATION: u16 = 30;

/// Produce the bookable start times (minutes since midnight) for one day.
///
/// For each configured range, candidates step by `slot_duration` from the
/// range start. A candidate `[t, t + slot_duration)` is yielded only if it
/// fits fully inside the range and overlaps none of the `busy` intervals
/// (the provider's pending/confirmed bookings for that date). Output is
/// ascending across all ranges.
///
/// A closed day, or a day with no ranges, yields nothing.
pub fn generate_slots(day: &DayAvailability, busy: &[Interval], slot_duration: u16) -> Vec<u16> {
    if !day.is_open || day.ranges.is_empty() || slot_duration == 0 {
        return vec![];
    }

    let mut slots = Vec::new();
    for range in &day.ranges {
        let mut t = range.start;
        while t + slot_duration <= range.end {
            let candidate = Interval::new(t, t + slot_duration);
            if find_conflict(candidate, busy).is_none() {
                slots.push(t);
            }
            t += slot_duration;
        }
    }
    slots.sort_unstable();
    slots
}
