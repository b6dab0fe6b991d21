//! Join-window policy for live sessions.
//!
//! Pure gate consulted before asking the RTC collaborator to mint a join
//! token; it never mints tokens itself.

use chrono::{DateTime, Duration, Utc};

use crate::models::booking::{Booking, BookingStatus};

/// Whether the booking may join its live session at `now`.
///
/// Requires a confirmed booking; the permitted window is
/// `[session_start - join_window_minutes, session_end]`.
pub fn can_join_now(booking: &Booking, now: DateTime<Utc>, join_window_minutes: i64) -> bool {
    if booking.status != BookingStatus::Confirmed {
        return false;
    }
    let window_open = booking.starts_at() - Duration::minutes(join_window_minutes);
    let window_close = booking.ends_at();
    window_open <= now && now <= window_close
}
