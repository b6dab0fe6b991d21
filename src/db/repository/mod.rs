//! Repository trait definitions.
//!
//! The traits here are the abstract storage interface for the booking engine.
//! The booking insert and the group fan-out are deliberately *conditional
//! writes*: the conflict check runs inside the same storage critical section
//! as the insert, so a naive read-then-write race cannot admit two
//! overlapping bookings.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Account, AvailabilityWeek, Booking, Plan, ProviderProfile, Subscription};

/// Repository trait for account records.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by id.
    ///
    /// # Returns
    /// * `Ok(Some(Account))` if found, `Ok(None)` otherwise
    async fn get_account(&self, account_id: Uuid) -> RepositoryResult<Option<Account>>;

    /// Insert or replace an account.
    async fn upsert_account(&self, account: Account) -> RepositoryResult<()>;

    /// Fetch the provider profile for a provider-role account.
    ///
    /// # Returns
    /// * `Ok(Some(ProviderProfile))` if the account exists and is a provider
    async fn get_provider_profile(
        &self,
        provider_id: Uuid,
    ) -> RepositoryResult<Option<ProviderProfile>>;
}

/// Repository trait for recurring weekly availability.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Fetch a provider's stored week, if any was published.
    async fn get_week(&self, provider_id: Uuid) -> RepositoryResult<Option<AvailabilityWeek>>;

    /// Replace a provider's week wholesale.
    async fn put_week(&self, provider_id: Uuid, week: AvailabilityWeek) -> RepositoryResult<()>;
}

/// Repository trait for booking records.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch a booking by id.
    async fn get_booking(&self, booking_id: Uuid) -> RepositoryResult<Option<Booking>>;

    /// Conditional write: insert the booking only if its interval overlaps no
    /// pending/confirmed booking for the same provider and date. The check and
    /// the insert are one indivisible operation.
    ///
    /// # Returns
    /// * `Ok(Booking)` - The inserted record
    /// * `Err(RepositoryError::Conflict)` - If an overlap exists
    async fn insert_booking_checked(&self, booking: Booking) -> RepositoryResult<Booking>;

    /// Insert a batch of bookings all-or-nothing. Used by the group-session
    /// fan-out; bookings in the batch intentionally share one time slot and
    /// are not conflict-checked against each other.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of bookings inserted (equals the batch size)
    async fn insert_bookings_atomic(&self, bookings: Vec<Booking>) -> RepositoryResult<usize>;

    /// Replace a booking record without conflict checking (status updates).
    async fn update_booking(&self, booking: Booking) -> RepositoryResult<Booking>;

    /// Conditional write for reschedule: replace the booking only if its new
    /// interval overlaps no *other* active booking for the provider and date.
    /// The booking's own prior interval is excluded from the check.
    async fn update_booking_checked(&self, booking: Booking) -> RepositoryResult<Booking>;

    /// All pending/confirmed bookings for a provider on a date.
    async fn active_bookings_for_day(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Confirmed, not-yet-reminded bookings starting inside
    /// `[window_start, window_end]`. Used by the reminder sweep.
    async fn bookings_needing_reminder(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Mark a booking's reminder as dispatched so the sweep stays idempotent.
    async fn mark_reminder_sent(&self, booking_id: Uuid) -> RepositoryResult<()>;
}

/// Repository trait for subscriptions and plans.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert or replace a subscription.
    async fn upsert_subscription(&self, subscription: Subscription) -> RepositoryResult<()>;

    /// Active subscriptions with sessions remaining whose validity window
    /// contains `date`, for the given provider and plan.
    async fn eligible_subscriptions(
        &self,
        provider_id: Uuid,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Subscription>>;

    /// Mark active subscriptions expired whose expiry date is before `today`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of subscriptions transitioned
    async fn expire_subscriptions_before(&self, today: NaiveDate) -> RepositoryResult<usize>;

    /// Fetch a plan by id.
    async fn get_plan(&self, plan_id: Uuid) -> RepositoryResult<Option<Plan>>;

    /// Insert or replace a plan.
    async fn upsert_plan(&self, plan: Plan) -> RepositoryResult<()>;
}

/// Combined repository interface consumed by the service layer.
#[async_trait]
pub trait FullRepository:
    AccountRepository + AvailabilityRepository + BookingRepository + SubscriptionRepository
{
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
