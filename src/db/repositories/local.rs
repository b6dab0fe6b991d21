//! In-memory repository for unit testing and local development.
//!
//! All state lives behind a single `parking_lot::RwLock`. Conditional writes
//! (`insert_booking_checked`, `update_booking_checked`, the fan-out batch)
//! take one write guard for the whole check-then-write sequence, which is the
//! in-memory equivalent of a serializable transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::db::repository::{
    AccountRepository, AvailabilityRepository, BookingRepository, ErrorContext, FullRepository,
    RepositoryError, RepositoryResult, SubscriptionRepository,
};
use crate::models::{
    Account, AccountRole, AvailabilityWeek, Booking, Plan, ProviderProfile, Subscription,
    SubscriptionStatus,
};
use crate::scheduling::interval::find_conflict;

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    weeks: HashMap<Uuid, AvailabilityWeek>,
    bookings: HashMap<Uuid, Booking>,
    subscriptions: HashMap<Uuid, Subscription>,
    plans: HashMap<Uuid, Plan>,
}

impl Inner {
    /// Intervals of active bookings for a provider/date, optionally excluding
    /// one booking id (reschedule self-exclusion).
    fn active_intervals(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Vec<crate::scheduling::Interval> {
        self.bookings
            .values()
            .filter(|b| {
                b.provider_id == provider_id
                    && b.date == date
                    && b.status.is_active()
                    && Some(b.id) != exclude
            })
            .map(|b| b.interval())
            .collect()
    }
}

/// In-memory repository.
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for LocalRepository {
    async fn get_account(&self, account_id: Uuid) -> RepositoryResult<Option<Account>> {
        Ok(self.inner.read().accounts.get(&account_id).cloned())
    }

    async fn upsert_account(&self, account: Account) -> RepositoryResult<()> {
        self.inner.write().accounts.insert(account.id, account);
        Ok(())
    }

    async fn get_provider_profile(
        &self,
        provider_id: Uuid,
    ) -> RepositoryResult<Option<ProviderProfile>> {
        let inner = self.inner.read();
        Ok(inner
            .accounts
            .get(&provider_id)
            .filter(|a| a.role == AccountRole::Provider)
            .and_then(|a| a.provider_profile.clone()))
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn get_week(&self, provider_id: Uuid) -> RepositoryResult<Option<AvailabilityWeek>> {
        Ok(self.inner.read().weeks.get(&provider_id).cloned())
    }

    async fn put_week(&self, provider_id: Uuid, week: AvailabilityWeek) -> RepositoryResult<()> {
        self.inner.write().weeks.insert(provider_id, week);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn get_booking(&self, booking_id: Uuid) -> RepositoryResult<Option<Booking>> {
        Ok(self.inner.read().bookings.get(&booking_id).cloned())
    }

    async fn insert_booking_checked(&self, booking: Booking) -> RepositoryResult<Booking> {
        let mut inner = self.inner.write();
        // Check and insert under the same write guard.
        let existing = inner.active_intervals(booking.provider_id, booking.date, None);
        if let Some(hit) = find_conflict(booking.interval(), &existing) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "requested {} overlaps existing booking {}",
                    booking.interval(),
                    hit
                ),
                ErrorContext::new("insert_booking_checked")
                    .with_entity("booking")
                    .with_entity_id(booking.id),
            ));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn insert_bookings_atomic(&self, bookings: Vec<Booking>) -> RepositoryResult<usize> {
        let mut inner = self.inner.write();
        for booking in &bookings {
            if inner.bookings.contains_key(&booking.id) {
                // Nothing has been committed yet, so rejecting here keeps the
                // batch all-or-nothing.
                return Err(RepositoryError::internal(format!(
                    "duplicate booking id {} in batch",
                    booking.id
                ))
                .with_operation("insert_bookings_atomic"));
            }
        }
        let count = bookings.len();
        for booking in bookings {
            inner.bookings.insert(booking.id, booking);
        }
        Ok(count)
    }

    async fn update_booking(&self, booking: Booking) -> RepositoryResult<Booking> {
        let mut inner = self.inner.write();
        if !inner.bookings.contains_key(&booking.id) {
            return Err(RepositoryError::not_found_with_context(
                format!("booking {} not found", booking.id),
                ErrorContext::new("update_booking").with_entity("booking"),
            ));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_booking_checked(&self, booking: Booking) -> RepositoryResult<Booking> {
        let mut inner = self.inner.write();
        if !inner.bookings.contains_key(&booking.id) {
            return Err(RepositoryError::not_found_with_context(
                format!("booking {} not found", booking.id),
                ErrorContext::new("update_booking_checked").with_entity("booking"),
            ));
        }
        let existing = inner.active_intervals(booking.provider_id, booking.date, Some(booking.id));
        if let Some(hit) = find_conflict(booking.interval(), &existing) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "requested {} overlaps existing booking {}",
                    booking.interval(),
                    hit
                ),
                ErrorContext::new("update_booking_checked")
                    .with_entity("booking")
                    .with_entity_id(booking.id),
            ));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn active_bookings_for_day(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.read();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.provider_id == provider_id && b.date == date && b.status.is_active())
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        Ok(bookings)
    }

    async fn bookings_needing_reminder(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.read();
        let mut due: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.status == crate::models::BookingStatus::Confirmed
                    && !b.reminder_sent
                    && b.starts_at() >= window_start
                    && b.starts_at() <= window_end
            })
            .cloned()
            .collect();
        due.sort_by_key(|b| b.starts_at());
        Ok(due)
    }

    async fn mark_reminder_sent(&self, booking_id: Uuid) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        match inner.bookings.get_mut(&booking_id) {
            Some(booking) => {
                booking.reminder_sent = true;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("booking {} not found", booking_id),
                ErrorContext::new("mark_reminder_sent").with_entity("booking"),
            )),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for LocalRepository {
    async fn upsert_subscription(&self, subscription: Subscription) -> RepositoryResult<()> {
        self.inner
            .write()
            .subscriptions
            .insert(subscription.id, subscription);
        Ok(())
    }

    async fn eligible_subscriptions(
        &self,
        provider_id: Uuid,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Subscription>> {
        let inner = self.inner.read();
        Ok(inner
            .subscriptions
            .values()
            .filter(|s| s.provider_id == provider_id && s.plan_id == plan_id && s.eligible_on(date))
            .cloned()
            .collect())
    }

    async fn expire_subscriptions_before(&self, today: NaiveDate) -> RepositoryResult<usize> {
        let mut inner = self.inner.write();
        let mut expired = 0;
        for subscription in inner.subscriptions.values_mut() {
            if subscription.status == SubscriptionStatus::Active && subscription.expiry_date < today
            {
                subscription.status = SubscriptionStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn get_plan(&self, plan_id: Uuid) -> RepositoryResult<Option<Plan>> {
        Ok(self.inner.read().plans.get(&plan_id).cloned())
    }

    async fn upsert_plan(&self, plan: Plan) -> RepositoryResult<()> {
        self.inner.write().plans.insert(plan.id, plan);
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
