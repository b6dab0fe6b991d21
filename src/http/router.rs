//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Availability
        .route(
            "/availability/{provider_id}",
            get(handlers::get_available_slots),
        )
        .route(
            "/providers/{provider_id}/availability",
            put(handlers::set_availability),
        )
        // Bookings
        .route("/bookings", post(handlers::create_booking))
        .route(
            "/bookings/{booking_id}/status",
            patch(handlers::update_booking_status),
        )
        .route(
            "/bookings/{booking_id}/reschedule",
            patch(handlers::reschedule_booking),
        )
        .route("/bookings/{booking_id}/join", post(handlers::join_booking))
        // Group sessions
        .route(
            "/providers/{provider_id}/group-sessions",
            post(handlers::schedule_group_session),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
