#![allow(dead_code)]

//! Shared fixtures for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use parking_lot::Mutex;
use uuid::Uuid;

use bookcore::db::{
    AccountRepository, AvailabilityRepository, FullRepository, LocalRepository,
    SubscriptionRepository,
};
use bookcore::models::{
    Account, AvailabilityWeek, ConsultationMethod, DayAvailability, Plan, PlanType,
    ProviderProfile, SessionType, Subscription, SubscriptionStatus, TimeRange,
};
use bookcore::services::{NotificationEvent, Notifier};

/// 2026-03-02 is a Monday.
pub fn a_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// 2026-03-01 is a Sunday.
pub fn a_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// Provider open Monday 09:00-12:00, everything else closed.
pub fn monday_morning_week() -> AvailabilityWeek {
    let mut week = AvailabilityWeek::all_closed();
    week.days[1] = DayAvailability::open(Weekday::Mon, vec![TimeRange::new(540, 720)]);
    week
}

/// Insert an unrestricted provider (hourly rate 80) with the given week.
pub async fn seed_provider(repo: &LocalRepository, week: AvailabilityWeek) -> Uuid {
    let provider_id = Uuid::new_v4();
    repo.upsert_account(Account::provider(
        provider_id,
        "provider",
        ProviderProfile {
            hourly_rate: 80.0,
            consultation_methods: vec![],
            session_types: vec![],
        },
    ))
    .await
    .unwrap();
    repo.put_week(provider_id, week).await.unwrap();
    provider_id
}

/// Insert a client account.
pub async fn seed_client(repo: &LocalRepository) -> Uuid {
    let client_id = Uuid::new_v4();
    repo.upsert_account(Account::client(client_id, "client"))
        .await
        .unwrap();
    client_id
}

/// Insert a monthly one-to-many plan for the provider.
pub async fn seed_group_plan(repo: &LocalRepository, provider_id: Uuid) -> Uuid {
    let plan_id = Uuid::new_v4();
    repo.upsert_plan(Plan {
        id: plan_id,
        provider_id,
        plan_type: PlanType::Monthly,
        session_format: SessionType::OneToMany,
        monthly_price: Some(120.0),
        classes_per_month: Some(4),
    })
    .await
    .unwrap();
    plan_id
}

/// Insert an active subscription for the plan, valid across 2026.
pub async fn seed_subscription(repo: &LocalRepository, provider_id: Uuid, plan_id: Uuid) -> Uuid {
    let client_id = seed_client(repo).await;
    repo.upsert_subscription(Subscription {
        id: Uuid::new_v4(),
        client_id,
        provider_id,
        plan_id,
        status: SubscriptionStatus::Active,
        sessions_remaining: 4,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    })
    .await
    .unwrap();
    client_id
}

pub fn video_request(
    provider_id: Uuid,
    client_id: Uuid,
    date: NaiveDate,
    start_time: u16,
    duration: u16,
) -> bookcore::services::CreateBookingRequest {
    bookcore::services::CreateBookingRequest {
        provider_id,
        client_id,
        date,
        start_time,
        duration,
        consultation_method: ConsultationMethod::Video,
        session_type: SessionType::OneOnOne,
        notes: None,
    }
}

/// Notifier that records every dispatch.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Uuid, NotificationEvent)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(Uuid, NotificationEvent)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        recipient: Uuid,
        event: NotificationEvent,
        _payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        self.sent.lock().push((recipient, event));
        Ok(())
    }
}

/// Notifier that always fails; bookings must still succeed.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(
        &self,
        _recipient: Uuid,
        _event: NotificationEvent,
        _payload: serde_json::Value,
    ) -> anyhow::Result<()> {
        anyhow::bail!("notification channel unavailable")
    }
}

/// Shared repository handle for route tests.
pub fn local_repo() -> Arc<LocalRepository> {
    Arc::new(LocalRepository::new())
}

/// Upcast helper for service calls.
pub fn as_full(repo: &Arc<LocalRepository>) -> Arc<dyn FullRepository> {
    Arc::clone(repo) as Arc<dyn FullRepository>
}
