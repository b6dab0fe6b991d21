//! Provider-initiated group-session fan-out.
//!
//! One request produces one confirmed booking per eligible subscriber, all
//! sharing a group-session id and a live-session room name. The per-subscriber
//! inserts are a single all-or-nothing repository write; a partial fan-out is
//! an invariant violation this module cannot produce.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::db::FullRepository;
use crate::models::{Booking, BookingStatus, ConsultationMethod, PlanType, SessionType};

use super::booking::validate_duration;
use super::error::{SchedulingError, ServiceResult};
use super::notifier::{notify_best_effort, NotificationEvent, Notifier};

/// Request to schedule a group session for all active subscribers of a plan.
#[derive(Debug, Clone)]
pub struct GroupSessionRequest {
    pub provider_id: Uuid,
    pub plan_id: Uuid,
    pub date: NaiveDate,
    /// Minutes since midnight.
    pub start_time: u16,
    pub duration: u16,
    pub consultation_method: ConsultationMethod,
    pub notes: Option<String>,
}

/// Result of a fan-out: the shared session id and how many bookings exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSessionOutcome {
    pub group_session_id: Uuid,
    pub created: usize,
}

/// Fan a group session out into one booking per eligible subscriber.
pub async fn schedule(
    repo: &dyn FullRepository,
    notifier: &dyn Notifier,
    request: GroupSessionRequest,
) -> ServiceResult<GroupSessionOutcome> {
    validate_duration(request.duration)?;

    let plan = repo.get_plan(request.plan_id).await?.ok_or_else(|| {
        SchedulingError::NotFound(format!("plan {} not found", request.plan_id))
    })?;

    if plan.provider_id != request.provider_id {
        return Err(SchedulingError::Authorization(
            "plan does not belong to this provider".to_string(),
        ));
    }
    if plan.plan_type != PlanType::Monthly {
        return Err(SchedulingError::Validation(
            "group sessions require a monthly plan".to_string(),
        ));
    }
    if plan.session_format != SessionType::OneToMany {
        return Err(SchedulingError::Validation(
            "group sessions require a one-to-many plan".to_string(),
        ));
    }

    let profile = repo
        .get_provider_profile(request.provider_id)
        .await?
        .ok_or_else(|| {
            SchedulingError::NotFound(format!("provider {} not found", request.provider_id))
        })?;
    if !profile.accepts_method(request.consultation_method) {
        return Err(SchedulingError::Validation(format!(
            "provider does not offer {:?} consultations",
            request.consultation_method
        )));
    }

    let subscribers = repo
        .eligible_subscriptions(request.provider_id, request.plan_id, request.date)
        .await?;
    if subscribers.is_empty() {
        return Err(SchedulingError::Validation(
            "no active subscribers for this plan".to_string(),
        ));
    }

    let end_time = request.start_time + request.duration;
    let group_session_id = Uuid::new_v4();
    let channel_name = format!("group-{}", group_session_id.simple());
    let price_per_session = plan.price_per_session();
    let created_at = Utc::now();

    let bookings: Vec<Booking> = subscribers
        .iter()
        .map(|sub| Booking {
            id: Uuid::new_v4(),
            client_id: sub.client_id,
            provider_id: request.provider_id,
            date: request.date,
            start_time: request.start_time,
            end_time,
            duration: request.duration,
            consultation_method: request.consultation_method,
            session_type: SessionType::OneToMany,
            price: price_per_session,
            // The provider initiates the session, so bookings skip Pending.
            status: BookingStatus::Confirmed,
            cancelled_by: None,
            cancellation_reason: None,
            notes: request.notes.clone(),
            group_session_id: Some(group_session_id),
            channel_name: Some(channel_name.clone()),
            reminder_sent: false,
            created_at,
        })
        .collect();

    let created = repo.insert_bookings_atomic(bookings).await?;

    let payload = serde_json::json!({
        "group_session_id": group_session_id,
        "date": request.date,
        "start_time": crate::models::format_minutes(request.start_time),
        "channel_name": channel_name,
    });
    futures::future::join_all(subscribers.iter().map(|sub| {
        notify_best_effort(
            notifier,
            sub.client_id,
            NotificationEvent::GroupSessionScheduled,
            payload.clone(),
        )
    }))
    .await;

    Ok(GroupSessionOutcome {
        group_session_id,
        created,
    })
}
