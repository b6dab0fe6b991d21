//! Availability management and slot listing.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::db::FullRepository;
use crate::models::AvailabilityWeek;
use crate::scheduling::{generate_slots, Interval};

use super::error::{SchedulingError, ServiceResult};

/// Fetch a provider's week, defaulting to all-closed when none was published.
pub async fn get_week(
    repo: &dyn FullRepository,
    provider_id: Uuid,
) -> ServiceResult<AvailabilityWeek> {
    Ok(repo
        .get_week(provider_id)
        .await?
        .unwrap_or_else(AvailabilityWeek::all_closed))
}

/// Replace a provider's week wholesale after structural validation.
pub async fn set_week(
    repo: &dyn FullRepository,
    provider_id: Uuid,
    week: AvailabilityWeek,
) -> ServiceResult<AvailabilityWeek> {
    if repo.get_provider_profile(provider_id).await?.is_none() {
        return Err(SchedulingError::NotFound(format!(
            "provider {} not found",
            provider_id
        )));
    }
    week.validate().map_err(SchedulingError::Validation)?;
    repo.put_week(provider_id, week.clone()).await?;
    Ok(week)
}

/// Bookable start times for a provider on a date.
///
/// The weekday is derived from the calendar date; existing pending/confirmed
/// bookings are excluded via the shared overlap predicate.
pub async fn available_slots(
    repo: &dyn FullRepository,
    provider_id: Uuid,
    date: NaiveDate,
    slot_duration: u16,
) -> ServiceResult<Vec<u16>> {
    if repo.get_provider_profile(provider_id).await?.is_none() {
        return Err(SchedulingError::NotFound(format!(
            "provider {} not found",
            provider_id
        )));
    }

    let week = get_week(repo, provider_id).await?;
    let day = week.day(date.weekday()).clone();

    let busy: Vec<Interval> = repo
        .active_bookings_for_day(provider_id, date)
        .await?
        .iter()
        .map(|b| b.interval())
        .collect();

    Ok(generate_slots(&day, &busy, slot_duration))
}
