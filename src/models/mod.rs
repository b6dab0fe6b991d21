//! Domain entities for the booking engine.
//!
//! All times of day are minutes since midnight (`u16`, `0..=1440`), parsed
//! from `"HH:MM"` strings at the request boundary. Calendar dates are
//! [`chrono::NaiveDate`]; instants are UTC.

pub mod account;
pub mod availability;
pub mod booking;
pub mod subscription;

pub use account::{Account, AccountRole, ConsultationMethod, ProviderProfile, SessionType};
pub use availability::{
    format_minutes, parse_time_of_day, AvailabilityWeek, DayAvailability, TimeRange, DAY_ORDER,
};
pub use booking::{Booking, BookingStatus, CancelledBy};
pub use subscription::{Plan, PlanType, Subscription, SubscriptionStatus};
