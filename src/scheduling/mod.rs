//! Scheduling core: interval arithmetic, slot generation, and the
//! join-window policy.
//!
//! [`interval`] holds the single overlap predicate every conflict decision in
//! the crate routes through.

pub mod access;
pub mod interval;
pub mod slots;

pub use access::can_join_now;
pub use interval::{find_conflict, Interval};
pub use slots::generate_slots;
