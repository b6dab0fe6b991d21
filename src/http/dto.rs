//! Data Transfer Objects for the HTTP API.
//!
//! Times of day cross the wire as `"HH:MM"` strings and are converted to
//! minutes-of-day in one schema-validated step at the boundary; a structural
//! error rejects the whole request instead of defaulting fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    format_minutes, parse_time_of_day, AvailabilityWeek, Booking, BookingStatus, CancelledBy,
    ConsultationMethod, DayAvailability, SessionType, TimeRange,
};
use crate::services::SchedulingError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

// =============================================================================
// Availability
// =============================================================================

/// Query parameters for the slot listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Date in `YYYY-MM-DD` form.
    pub date: NaiveDate,
}

/// Response for the slot listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    /// Bookable start times as `"HH:MM"`, ascending.
    pub available_slots: Vec<String>,
    pub day_of_week: String,
    /// Present when the provider is closed that day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One range of a day in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRangeDto {
    pub start: String,
    pub end: String,
}

/// One day of a week in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailabilityDto {
    pub day: String,
    pub is_open: bool,
    #[serde(default)]
    pub time_ranges: Vec<TimeRangeDto>,
}

/// Request body replacing a provider's whole week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub days: Vec<DayAvailabilityDto>,
}

fn parse_weekday(s: &str) -> Result<chrono::Weekday, SchedulingError> {
    s.parse::<chrono::Weekday>()
        .map_err(|_| SchedulingError::Validation(format!("unknown weekday '{}'", s)))
}

impl TryFrom<SetAvailabilityRequest> for AvailabilityWeek {
    type Error = SchedulingError;

    fn try_from(req: SetAvailabilityRequest) -> Result<Self, Self::Error> {
        let mut days = Vec::with_capacity(req.days.len());
        for day in req.days {
            let mut ranges = Vec::with_capacity(day.time_ranges.len());
            for range in day.time_ranges {
                let start =
                    parse_time_of_day(&range.start).map_err(SchedulingError::Validation)?;
                let end = parse_time_of_day(&range.end).map_err(SchedulingError::Validation)?;
                ranges.push(TimeRange::new(start, end));
            }
            days.push(DayAvailability {
                day: parse_weekday(&day.day)?,
                is_open: day.is_open,
                ranges,
            });
        }
        Ok(AvailabilityWeek { days })
    }
}

impl From<AvailabilityWeek> for SetAvailabilityRequest {
    fn from(week: AvailabilityWeek) -> Self {
        Self {
            days: week
                .days
                .into_iter()
                .map(|d| DayAvailabilityDto {
                    day: d.day.to_string(),
                    is_open: d.is_open,
                    time_ranges: d
                        .ranges
                        .into_iter()
                        .map(|r| TimeRangeDto {
                            start: format_minutes(r.start),
                            end: format_minutes(r.end),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// Request body for creating a booking. The client id comes from the
/// `x-account-id` header, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    /// `"HH:MM"`
    pub start_time: String,
    /// Minutes; multiple of 30 in `[30, 240]`.
    pub duration: u16,
    pub consultation_method: ConsultationMethod,
    pub session_type: SessionType,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Booking in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDto {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            client_id: b.client_id,
            provider_id: b.provider_id,
            date: b.date,
            start_time: format_minutes(b.start_time),
            end_time: format_minutes(b.end_time),
            duration: b.duration,
            consultation_method: b.consultation_method,
            session_type: b.session_type,
            price: b.price,
            status: b.status,
            cancelled_by: b.cancelled_by,
            cancellation_reason: b.cancellation_reason,
            notes: b.notes,
            group_session_id: b.group_session_id,
            channel_name: b.channel_name,
        }
    }
}

/// Request body for a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Request body for a reschedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub session_date: NaiveDate,
    /// `"HH:MM"`
    pub start_time: String,
    pub duration: u16,
}

// =============================================================================
// Group sessions and join tokens
// =============================================================================

/// Request body for a group-session fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSessionRequest {
    pub plan_id: Uuid,
    pub date: NaiveDate,
    /// `"HH:MM"`
    pub start_time: String,
    pub duration: u16,
    pub consultation_method: ConsultationMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Response for a group-session fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSessionResponse {
    pub group_session_id: Uuid,
    pub appointments_created: usize,
}

/// Response for a join-token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTokenResponse {
    pub token: String,
    pub channel_name: String,
}
