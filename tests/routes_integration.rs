//! End-to-end request tests against the axum router.

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bookcore::config::AppConfig;
use bookcore::db::LocalRepository;
use bookcore::http::{create_router, AppState};
use bookcore::services::{FixedClock, StaticTokenMinter, TracingNotifier};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use support::*;
use tower::ServiceExt;
use uuid::Uuid;

/// Router over a fresh in-memory repository with a clock fixed at
/// 2026-03-02 09:50 UTC (just inside the join window of a 10:00 session).
fn test_app() -> (Router, Arc<LocalRepository>) {
    let repo = local_repo();
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 50, 0).unwrap(),
    ));
    let state = AppState::new(
        as_full(&repo),
        Arc::new(TracingNotifier),
        Arc::new(StaticTokenMinter),
        clock,
        AppConfig::default(),
    );
    (create_router(state), repo)
}

fn request(method: Method, uri: &str, account: Option<Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = account {
        builder = builder.header("x-account-id", id.to_string());
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_body(provider: Uuid, start: &str) -> Value {
    json!({
        "provider_id": provider,
        "date": "2026-03-02",
        "start_time": start,
        "duration": 60,
        "consultation_method": "video",
        "session_type": "one_on_one",
    })
}

#[tokio::test]
async fn health_reports_connected_repository() {
    let (app, _repo) = test_app();
    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["repository"], "connected");
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let client = seed_client(&repo).await;

    // Create.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/v1/bookings",
            Some(client),
            Some(booking_body(provider, "10:00")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["start_time"], "10:00");
    assert_eq!(body["end_time"], "11:00");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["price"], 80.0);
    let booking_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    // Overlapping second booking conflicts.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/v1/bookings",
            Some(client),
            Some(booking_body(provider, "10:30")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Provider confirms.
    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &format!("/v1/bookings/{}/status", booking_id),
            Some(provider),
            Some(json!({ "status": "confirmed" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "confirmed");

    // Clock is 09:50; a 10:00 session is inside the 15-minute join window.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/v1/bookings/{}/join", booking_id),
            Some(client),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["token"].as_str().unwrap().starts_with("tok:"));
    assert_eq!(
        body["channel_name"],
        format!("booking-{}", booking_id.simple())
    );

    // A stranger may not join.
    let response = app
        .oneshot(request(
            Method::POST,
            &format!("/v1/bookings/{}/join", booking_id),
            Some(Uuid::new_v4()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_requires_identity_header() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/v1/bookings",
            None,
            Some(booking_body(provider, "10:00")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_duration_is_a_bad_request() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let client = seed_client(&repo).await;

    let mut body = booking_body(provider, "10:00");
    body["duration"] = json!(45);
    let response = app
        .oneshot(request(Method::POST, "/v1/bookings", Some(client), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_provider_is_a_not_found() {
    let (app, repo) = test_app();
    let client = seed_client(&repo).await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/v1/bookings",
            Some(client),
            Some(booking_body(Uuid::new_v4(), "10:00")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn availability_roundtrip_and_slot_listing() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;

    // Only the provider may replace their week.
    let week_body = json!({
        "days": [
            { "day": "Sunday", "is_open": false },
            { "day": "Monday", "is_open": true,
              "time_ranges": [ { "start": "09:00", "end": "11:00" } ] },
            { "day": "Tuesday", "is_open": false },
            { "day": "Wednesday", "is_open": false },
            { "day": "Thursday", "is_open": false },
            { "day": "Friday", "is_open": false },
            { "day": "Saturday", "is_open": false }
        ]
    });
    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/v1/providers/{}/availability", provider),
            Some(Uuid::new_v4()),
            Some(week_body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/v1/providers/{}/availability", provider),
            Some(provider),
            Some(week_body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 2026-03-02 is a Monday: slots reflect the new 09:00-11:00 window.
    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/v1/availability/{}?date=2026-03-02", provider),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["day_of_week"], "Mon");
    assert_eq!(
        body["available_slots"],
        json!(["09:00", "09:30", "10:00", "10:30"])
    );

    // Closed day carries an explanatory message.
    let response = app
        .oneshot(request(
            Method::GET,
            &format!("/v1/availability/{}?date=2026-03-01", provider),
            None,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["available_slots"], json!([]));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn group_session_fanout_over_http() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, provider).await;
    seed_subscription(&repo, provider, plan).await;
    seed_subscription(&repo, provider, plan).await;

    let body = json!({
        "plan_id": plan,
        "date": "2026-03-02",
        "start_time": "10:00",
        "duration": 60,
        "consultation_method": "video",
    });
    let response = app
        .oneshot(request(
            Method::POST,
            &format!("/v1/providers/{}/group-sessions", provider),
            Some(provider),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["appointments_created"], 2);
    assert!(body["group_session_id"].is_string());
}

#[tokio::test]
async fn reschedule_over_http() {
    let (app, repo) = test_app();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let client = seed_client(&repo).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/v1/bookings",
            Some(client),
            Some(booking_body(provider, "10:00")),
        ))
        .await
        .unwrap();
    let booking_id = json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // 2026-03-09 is the following Monday.
    let response = app
        .oneshot(request(
            Method::PATCH,
            &format!("/v1/bookings/{}/reschedule", booking_id),
            Some(client),
            Some(json!({
                "session_date": "2026-03-09",
                "start_time": "09:30",
                "duration": 30,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["date"], "2026-03-09");
    assert_eq!(body["start_time"], "09:30");
    assert_eq!(body["end_time"], "10:00");
    assert_eq!(body["status"], "pending");
}
