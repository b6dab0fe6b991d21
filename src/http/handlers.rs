//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. Requester identity arrives in the
//! `x-account-id` header; account provisioning itself is external.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Datelike;
use uuid::Uuid;

use crate::models::{format_minutes, parse_time_of_day, AvailabilityWeek};
use crate::scheduling::access::can_join_now;
use crate::services::{self, ParticipantRole};

use super::dto::{
    AvailabilityQuery, AvailableSlotsResponse, BookingDto, CreateBookingRequest,
    GroupSessionRequest, GroupSessionResponse, HealthResponse, JoinTokenResponse,
    RescheduleRequest, SetAvailabilityRequest, UpdateStatusRequest,
};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Extract the requesting account id from the `x-account-id` header.
fn requester_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get("x-account-id")
        .ok_or_else(|| AppError::Unauthorized("missing x-account-id header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("malformed x-account-id header".to_string()))?;
    raw.parse()
        .map_err(|_| AppError::Unauthorized("x-account-id is not a valid id".to_string()))
}

fn parse_start_time(s: &str) -> Result<u16, AppError> {
    parse_time_of_day(s).map_err(AppError::BadRequest)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/availability/{provider_id}?date=YYYY-MM-DD
///
/// List bookable start times for a provider on a date.
pub async fn get_available_slots(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailableSlotsResponse> {
    let slots = services::availability::available_slots(
        state.repository.as_ref(),
        provider_id,
        query.date,
        state.config.scheduling.slot_duration_minutes,
    )
    .await?;

    let day_of_week = query.date.weekday().to_string();
    let message = if slots.is_empty() {
        Some("provider has no bookable slots on this date".to_string())
    } else {
        None
    };

    Ok(Json(AvailableSlotsResponse {
        available_slots: slots.iter().map(|&m| format_minutes(m)).collect(),
        day_of_week,
        message,
    }))
}

/// PUT /v1/providers/{id}/availability
///
/// Replace a provider's recurring weekly availability wholesale.
pub async fn set_availability(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<SetAvailabilityRequest>,
) -> HandlerResult<SetAvailabilityRequest> {
    let requester = requester_id(&headers)?;
    if requester != provider_id {
        return Err(AppError::Forbidden(
            "only the provider may update their availability".to_string(),
        ));
    }

    let week = AvailabilityWeek::try_from(request)?;
    let stored =
        services::availability::set_week(state.repository.as_ref(), provider_id, week).await?;
    Ok(Json(stored.into()))
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<BookingDto>), AppError> {
    let client_id = requester_id(&headers)?;
    let start_time = parse_start_time(&request.start_time)?;

    let booking = services::booking::create(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        services::CreateBookingRequest {
            provider_id: request.provider_id,
            client_id,
            date: request.date,
            start_time,
            duration: request.duration,
            consultation_method: request.consultation_method,
            session_type: request.session_type,
            notes: request.notes,
        },
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(booking.into())))
}

/// PATCH /v1/bookings/{id}/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<UpdateStatusRequest>,
) -> HandlerResult<BookingDto> {
    let requester = requester_id(&headers)?;

    let booking = services::booking::update_status(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        booking_id,
        requester,
        request.status,
        request.cancellation_reason,
    )
    .await?;

    Ok(Json(booking.into()))
}

/// PATCH /v1/bookings/{id}/reschedule
pub async fn reschedule_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<RescheduleRequest>,
) -> HandlerResult<BookingDto> {
    let requester = requester_id(&headers)?;
    let start_time = parse_start_time(&request.start_time)?;

    let booking = services::reschedule::reschedule(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        state.clock.as_ref(),
        booking_id,
        requester,
        request.session_date,
        start_time,
        request.duration,
    )
    .await?;

    Ok(Json(booking.into()))
}

/// POST /v1/bookings/{id}/join
///
/// Mint a join token for a confirmed booking inside its join window.
pub async fn join_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    headers: HeaderMap,
) -> HandlerResult<JoinTokenResponse> {
    let requester = requester_id(&headers)?;

    let booking = state
        .repository
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", booking_id)))?;

    if !booking.involves(requester) {
        return Err(AppError::Forbidden(
            "only the booking's client or provider may join".to_string(),
        ));
    }

    let now = state.clock.now_utc();
    if !can_join_now(&booking, now, state.config.scheduling.join_window_minutes) {
        return Err(AppError::Forbidden(
            "the session cannot be joined at this time".to_string(),
        ));
    }

    let channel_name = booking
        .channel_name
        .clone()
        .unwrap_or_else(|| format!("booking-{}", booking.id.simple()));
    let role = if requester == booking.provider_id {
        ParticipantRole::Host
    } else {
        ParticipantRole::Attendee
    };
    let ttl = (booking.ends_at() - now).num_seconds().max(60) as u64;

    let token = state
        .token_minter
        .mint_join_token(&channel_name, requester, role, ttl)
        .await
        .map_err(|e| AppError::Internal(format!("token minting failed: {}", e)))?;

    Ok(Json(JoinTokenResponse {
        token,
        channel_name,
    }))
}

// =============================================================================
// Group sessions
// =============================================================================

/// POST /v1/providers/{id}/group-sessions
pub async fn schedule_group_session(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<GroupSessionRequest>,
) -> Result<(axum::http::StatusCode, Json<GroupSessionResponse>), AppError> {
    let requester = requester_id(&headers)?;
    if requester != provider_id {
        return Err(AppError::Forbidden(
            "only the provider may schedule their group sessions".to_string(),
        ));
    }

    let start_time = parse_start_time(&request.start_time)?;

    let outcome = services::group_session::schedule(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        services::GroupSessionRequest {
            provider_id,
            plan_id: request.plan_id,
            date: request.date,
            start_time,
            duration: request.duration,
            consultation_method: request.consultation_method,
            notes: request.notes,
        },
    )
    .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(GroupSessionResponse {
            group_session_id: outcome.group_session_id,
            appointments_created: outcome.created,
        }),
    ))
}
