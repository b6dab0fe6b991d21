//! Group-session fan-out tests.

mod support;

use bookcore::db::{BookingRepository, LocalRepository, SubscriptionRepository};
use bookcore::models::{BookingStatus, ConsultationMethod, Plan, PlanType, SessionType};
use bookcore::services::{group_session, GroupSessionRequest, SchedulingError, TracingNotifier};
use support::*;
use uuid::Uuid;

fn fanout_request(provider_id: Uuid, plan_id: Uuid) -> GroupSessionRequest {
    GroupSessionRequest {
        provider_id,
        plan_id,
        date: a_monday(),
        start_time: 600,
        duration: 60,
        consultation_method: ConsultationMethod::Video,
        notes: None,
    }
}

#[tokio::test]
async fn fanout_creates_one_confirmed_booking_per_subscriber() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, provider).await;

    let mut clients = Vec::new();
    for _ in 0..3 {
        clients.push(seed_subscription(&repo, provider, plan).await);
    }

    let outcome = group_session::schedule(&repo, &TracingNotifier, fanout_request(provider, plan))
        .await
        .unwrap();
    assert_eq!(outcome.created, 3);

    let bookings = repo.active_bookings_for_day(provider, a_monday()).await.unwrap();
    assert_eq!(bookings.len(), 3);

    let channel = bookings[0].channel_name.clone().unwrap();
    for b in &bookings {
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.session_type, SessionType::OneToMany);
        assert_eq!(b.group_session_id, Some(outcome.group_session_id));
        assert_eq!(b.channel_name.as_deref(), Some(channel.as_str()));
        // 120.0 monthly over 4 classes
        assert_eq!(b.price, 30.0);
        assert!(clients.contains(&b.client_id));
    }
}

#[tokio::test]
async fn fanout_without_subscribers_creates_nothing() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, provider).await;

    let err = group_session::schedule(&repo, &TracingNotifier, fanout_request(provider, plan))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Validation(_)));

    let bookings = repo.active_bookings_for_day(provider, a_monday()).await.unwrap();
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn fanout_rejects_plan_of_another_provider() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let other_provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, other_provider).await;
    seed_subscription(&repo, other_provider, plan).await;

    let err = group_session::schedule(&repo, &TracingNotifier, fanout_request(provider, plan))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Authorization(_)));
}

#[tokio::test]
async fn fanout_requires_monthly_one_to_many_plan() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;

    let plan_id = Uuid::new_v4();
    repo.upsert_plan(Plan {
        id: plan_id,
        provider_id: provider,
        plan_type: PlanType::PerSession,
        session_format: SessionType::OneToMany,
        monthly_price: Some(120.0),
        classes_per_month: Some(4),
    })
    .await
    .unwrap();
    seed_subscription(&repo, provider, plan_id).await;

    let err = group_session::schedule(&repo, &TracingNotifier, fanout_request(provider, plan_id))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Validation(_)));
}

#[tokio::test]
async fn fanout_rejects_unknown_plan() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;

    let err = group_session::schedule(
        &repo,
        &TracingNotifier,
        fanout_request(provider, Uuid::new_v4()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SchedulingError::NotFound(_)));
}

#[tokio::test]
async fn expired_and_exhausted_subscribers_are_skipped() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, provider).await;
    seed_subscription(&repo, provider, plan).await;

    // Exhausted subscription: zero sessions remaining.
    let exhausted_client = seed_client(&repo).await;
    repo.upsert_subscription(bookcore::models::Subscription {
        id: Uuid::new_v4(),
        client_id: exhausted_client,
        provider_id: provider,
        plan_id: plan,
        status: bookcore::models::SubscriptionStatus::Active,
        sessions_remaining: 0,
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        expiry_date: chrono::NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    })
    .await
    .unwrap();

    let outcome = group_session::schedule(&repo, &TracingNotifier, fanout_request(provider, plan))
        .await
        .unwrap();
    assert_eq!(outcome.created, 1);
}

#[tokio::test]
async fn subscribers_are_notified_after_fanout() {
    let repo = LocalRepository::new();
    let provider = seed_provider(&repo, monday_morning_week()).await;
    let plan = seed_group_plan(&repo, provider).await;
    let client = seed_subscription(&repo, provider, plan).await;

    let notifier = RecordingNotifier::default();
    group_session::schedule(&repo, &notifier, fanout_request(provider, plan))
        .await
        .unwrap();

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, client);
}
