//! Booking creation and status lifecycle.

use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::db::FullRepository;
use crate::models::{
    Booking, BookingStatus, CancelledBy, ConsultationMethod, ProviderProfile, SessionType,
};

use super::error::{SchedulingError, ServiceResult};
use super::notifier::{notify_best_effort, NotificationEvent, Notifier};

/// Smallest and largest accepted session lengths, in minutes.
pub const MIN_DURATION: u16 = 30;
pub const MAX_DURATION: u16 = 240;

/// Request to create an individual booking.
#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub provider_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    /// Minutes since midnight.
    pub start_time: u16,
    pub duration: u16,
    pub consultation_method: ConsultationMethod,
    pub session_type: SessionType,
    pub notes: Option<String>,
}

/// Duration must be a half-hour multiple in `[30, 240]`.
pub fn validate_duration(duration: u16) -> ServiceResult<()> {
    if !(MIN_DURATION..=MAX_DURATION).contains(&duration) || duration % 30 != 0 {
        return Err(SchedulingError::Validation(format!(
            "duration must be a multiple of 30 between {} and {} minutes, got {}",
            MIN_DURATION, MAX_DURATION, duration
        )));
    }
    Ok(())
}

/// Price for a session at the provider's hourly rate, rounded to a whole unit.
pub fn session_price(hourly_rate: f64, duration: u16) -> f64 {
    (hourly_rate * f64::from(duration) / 60.0).round()
}

fn check_offering(
    profile: &ProviderProfile,
    method: ConsultationMethod,
    session_type: SessionType,
) -> ServiceResult<()> {
    if !profile.accepts_method(method) {
        return Err(SchedulingError::Validation(format!(
            "provider does not offer {:?} consultations",
            method
        )));
    }
    if !profile.accepts_session_type(session_type) {
        return Err(SchedulingError::Validation(format!(
            "provider does not offer {:?} sessions",
            session_type
        )));
    }
    Ok(())
}

/// Reject requests outside the provider's availability for the request's
/// weekday. The day is computed from the calendar date, never from a stored
/// day label.
pub async fn check_within_availability(
    repo: &dyn FullRepository,
    provider_id: Uuid,
    date: NaiveDate,
    start: u16,
    end: u16,
) -> ServiceResult<()> {
    let week = super::availability::get_week(repo, provider_id).await?;
    let day = week.day(date.weekday());

    if !day.is_open || day.ranges.is_empty() {
        return Err(SchedulingError::Validation(format!(
            "provider is not available on this day ({})",
            date.weekday()
        )));
    }
    if !day.ranges.iter().any(|r| r.contains(start, end)) {
        let ranges = day
            .ranges
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(SchedulingError::Validation(format!(
            "requested time is outside available hours; valid ranges on {}: {}",
            day.day, ranges
        )));
    }
    Ok(())
}

/// Create an individual booking.
///
/// Validation order: duration, then provider lookup, then offering checks,
/// then conflict detection, then the availability-window check. The final
/// insert re-runs the conflict check inside one indivisible repository
/// operation. The creation notification is best-effort after the write.
pub async fn create(
    repo: &dyn FullRepository,
    notifier: &dyn Notifier,
    request: CreateBookingRequest,
) -> ServiceResult<Booking> {
    validate_duration(request.duration)?;

    let profile = repo
        .get_provider_profile(request.provider_id)
        .await?
        .ok_or_else(|| {
            SchedulingError::NotFound(format!("provider {} not found", request.provider_id))
        })?;

    check_offering(&profile, request.consultation_method, request.session_type)?;

    let end_time = request.start_time + request.duration;

    // Advisory conflict check so an occupied slot reports as a conflict even
    // when the request is also outside opening hours. The authoritative check
    // re-runs inside the insert's critical section.
    let busy: Vec<crate::scheduling::Interval> = repo
        .active_bookings_for_day(request.provider_id, request.date)
        .await?
        .iter()
        .map(|b| b.interval())
        .collect();
    let candidate = crate::scheduling::Interval::new(request.start_time, end_time);
    if let Some(hit) = crate::scheduling::find_conflict(candidate, &busy) {
        return Err(SchedulingError::Conflict(format!(
            "requested {} overlaps existing booking {}",
            candidate, hit
        )));
    }

    check_within_availability(
        repo,
        request.provider_id,
        request.date,
        request.start_time,
        end_time,
    )
    .await?;

    let booking = Booking {
        id: Uuid::new_v4(),
        client_id: request.client_id,
        provider_id: request.provider_id,
        date: request.date,
        start_time: request.start_time,
        end_time,
        duration: request.duration,
        consultation_method: request.consultation_method,
        session_type: request.session_type,
        price: session_price(profile.hourly_rate, request.duration),
        status: BookingStatus::Pending,
        cancelled_by: None,
        cancellation_reason: None,
        notes: request.notes,
        group_session_id: None,
        channel_name: None,
        reminder_sent: false,
        created_at: Utc::now(),
    };

    // The overlap check runs inside the repository's critical section.
    let booking = repo.insert_booking_checked(booking).await?;

    let payload = serde_json::json!({
        "booking_id": booking.id,
        "date": booking.date,
        "start_time": crate::models::format_minutes(booking.start_time),
    });
    notify_best_effort(
        notifier,
        booking.provider_id,
        NotificationEvent::BookingCreated,
        payload,
    )
    .await;

    Ok(booking)
}

/// Apply a status transition as the given requester.
///
/// Only the booking's client or provider may act. Re-applying the current
/// status is a no-op that returns the record unchanged, so a duplicate cancel
/// can never corrupt `cancelled_by`.
pub async fn update_status(
    repo: &dyn FullRepository,
    notifier: &dyn Notifier,
    booking_id: Uuid,
    requester_id: Uuid,
    new_status: BookingStatus,
    cancellation_reason: Option<String>,
) -> ServiceResult<Booking> {
    let mut booking = repo
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| SchedulingError::NotFound(format!("booking {} not found", booking_id)))?;

    if !booking.involves(requester_id) {
        return Err(SchedulingError::Authorization(
            "only the booking's client or provider may update it".to_string(),
        ));
    }

    if booking.status == new_status {
        return Ok(booking);
    }

    if !booking.status.can_transition_to(new_status) {
        return Err(SchedulingError::Validation(format!(
            "cannot change a {} booking to {}",
            booking.status, new_status
        )));
    }

    booking.status = new_status;
    if new_status == BookingStatus::Cancelled {
        booking.cancelled_by = Some(if requester_id == booking.client_id {
            CancelledBy::Client
        } else {
            CancelledBy::Provider
        });
        booking.cancellation_reason = cancellation_reason;
    }

    let booking = repo.update_booking(booking).await?;

    let counterpart = if requester_id == booking.client_id {
        booking.provider_id
    } else {
        booking.client_id
    };
    notify_best_effort(
        notifier,
        counterpart,
        NotificationEvent::BookingStatusChanged,
        serde_json::json!({ "booking_id": booking.id, "status": booking.status }),
    )
    .await;

    Ok(booking)
}
