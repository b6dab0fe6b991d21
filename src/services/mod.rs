//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP layer and the repository. They own
//! validation order, pricing, and the status lifecycle; conflict-checked
//! writes are delegated to the repository so the check and the write share
//! one critical section.

pub mod availability;
pub mod booking;
pub mod clock;
pub mod error;
pub mod group_session;
pub mod notifier;
pub mod reschedule;
pub mod rtc;
pub mod sweeper;

pub use booking::CreateBookingRequest;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{SchedulingError, ServiceResult};
pub use group_session::{GroupSessionOutcome, GroupSessionRequest};
pub use notifier::{NotificationEvent, Notifier, TracingNotifier};
pub use rtc::{ParticipantRole, StaticTokenMinter, TokenMinter};
pub use sweeper::{SweepReport, Sweeper};
