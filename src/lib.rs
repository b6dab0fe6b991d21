//! # bookcore
//!
//! Scheduling and conflict-resolution engine for a service-provider booking
//! platform. Clients reserve time with providers who publish recurring weekly
//! availability; the engine computes bookable slots, prevents double-booking,
//! handles reschedules, and fans a provider-initiated group session out into
//! one booking per active subscriber. The backend exposes a REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain entities (accounts, availability, bookings, subscriptions)
//! - [`scheduling`]: Interval arithmetic, slot generation, and join-window policy
//! - [`services`]: High-level business logic (booking, reschedule, group fan-out)
//! - [`db`]: Repository pattern and persistence layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! All overlap decisions route through a single predicate,
//! [`scheduling::interval::Interval::overlaps`]; slot generation, booking
//! creation, and reschedule share it so their conflict semantics cannot
//! diverge. The conflict check and the booking insert execute as one
//! indivisible repository operation, so concurrent requests for the same slot
//! cannot both succeed.

pub mod config;
pub mod db;
pub mod models;
pub mod scheduling;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
