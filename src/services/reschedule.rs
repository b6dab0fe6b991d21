//! Reschedule an existing booking to a new date and time.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::FullRepository;
use crate::models::{Booking, BookingStatus};

use super::booking::{check_within_availability, validate_duration};
use super::clock::Clock;
use super::error::{SchedulingError, ServiceResult};
use super::notifier::{notify_best_effort, NotificationEvent, Notifier};

/// Move a booking to a new date/time/duration.
///
/// Only the original client may reschedule. The booking's own prior interval
/// is excluded from conflict detection, so moving within an overlapping
/// window (e.g. 09:00-09:30 to 09:15-09:45) succeeds when nothing else is
/// booked. On success the booking returns to `Pending` for re-confirmation
/// and any cancellation bookkeeping is cleared.
pub async fn reschedule(
    repo: &dyn FullRepository,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
    booking_id: Uuid,
    requester_id: Uuid,
    new_date: NaiveDate,
    new_start_time: u16,
    new_duration: u16,
) -> ServiceResult<Booking> {
    let mut booking = repo
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| SchedulingError::NotFound(format!("booking {} not found", booking_id)))?;

    if booking.client_id != requester_id {
        return Err(SchedulingError::Authorization(
            "only the booking's client may reschedule it".to_string(),
        ));
    }

    if matches!(
        booking.status,
        BookingStatus::Cancelled | BookingStatus::Completed
    ) {
        return Err(SchedulingError::Validation(format!(
            "a {} booking cannot be rescheduled",
            booking.status
        )));
    }

    validate_duration(new_duration)?;

    let today = clock.today();
    if new_date < today {
        return Err(SchedulingError::Validation(
            "cannot reschedule to a past date".to_string(),
        ));
    }
    if new_date == today && new_start_time < clock.minute_of_day() {
        return Err(SchedulingError::Validation(
            "cannot reschedule to a time earlier than now".to_string(),
        ));
    }

    let new_end_time = new_start_time + new_duration;

    // Advisory conflict check against the provider's other active bookings;
    // the authoritative check re-runs inside the checked update.
    let busy: Vec<crate::scheduling::Interval> = repo
        .active_bookings_for_day(booking.provider_id, new_date)
        .await?
        .iter()
        .filter(|b| b.id != booking.id)
        .map(|b| b.interval())
        .collect();
    let candidate = crate::scheduling::Interval::new(new_start_time, new_end_time);
    if let Some(hit) = crate::scheduling::find_conflict(candidate, &busy) {
        return Err(SchedulingError::Conflict(format!(
            "requested {} overlaps existing booking {}",
            candidate, hit
        )));
    }

    check_within_availability(
        repo,
        booking.provider_id,
        new_date,
        new_start_time,
        new_end_time,
    )
    .await?;

    booking.date = new_date;
    booking.start_time = new_start_time;
    booking.end_time = new_end_time;
    booking.duration = new_duration;
    booking.status = BookingStatus::Pending;
    booking.cancelled_by = None;
    booking.cancellation_reason = None;

    // Conflict check (excluding this booking's own id) and the overwrite run
    // inside the repository's critical section.
    let booking = repo.update_booking_checked(booking).await?;

    notify_best_effort(
        notifier,
        booking.provider_id,
        NotificationEvent::BookingRescheduled,
        serde_json::json!({
            "booking_id": booking.id,
            "date": booking.date,
            "start_time": crate::models::format_minutes(booking.start_time),
        }),
    )
    .await;

    Ok(booking)
}
