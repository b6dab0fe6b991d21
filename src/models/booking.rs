//! Booking entity and its status lifecycle.
//!
//! Bookings are never physically deleted: their lifecycle is status-only,
//! one-directional away from `Pending`, and never out of a terminal status.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{ConsultationMethod, SessionType};
use crate::scheduling::interval::Interval;

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }

    /// Whether the booking still occupies its time slot for conflict purposes.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Allowed one-directional transitions. Re-applying the current status is
    /// handled as a no-op by the caller, not here.
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::Confirmed | Self::Rejected | Self::Cancelled | Self::Completed
            ),
            Self::Confirmed => matches!(next, Self::Completed | Self::Cancelled),
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Which party cancelled a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    Client,
    Provider,
}

/// A reserved session between a client and a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    /// Minutes since midnight.
    pub start_time: u16,
    /// Minutes since midnight; always `start_time + duration`.
    pub end_time: u16,
    /// Session length in minutes (30..=240, multiple of 30).
    pub duration: u16,
    pub consultation_method: ConsultationMethod,
    pub session_type: SessionType,
    pub price: f64,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<CancelledBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set on bookings created by a group-session fan-out; all bookings of one
    /// fan-out share the same value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_session_id: Option<Uuid>,
    /// Shared live-session room name for group sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Whether the background sweeper has already dispatched a reminder.
    #[serde(default)]
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The booking's time-of-day interval for overlap checks.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }

    /// Session start as a UTC instant.
    pub fn starts_at(&self) -> DateTime<Utc> {
        minute_of_day_to_utc(self.date, self.start_time)
    }

    /// Session end as a UTC instant.
    pub fn ends_at(&self) -> DateTime<Utc> {
        minute_of_day_to_utc(self.date, self.end_time)
    }

    /// Whether the given account is a party to this booking.
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.client_id == account_id || self.provider_id == account_id
    }
}

/// Convert a date plus minutes-since-midnight to a UTC instant.
///
/// `minutes == 1440` rolls over to midnight of the following day.
pub fn minute_of_day_to_utc(date: NaiveDate, minutes: u16) -> DateTime<Utc> {
    let (date, minutes) = if minutes >= 1440 {
        (date + Duration::days(1), minutes - 1440)
    } else {
        (date, minutes)
    };
    let time = NaiveTime::from_hms_opt(u32::from(minutes) / 60, u32::from(minutes) % 60, 0)
        .unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}
