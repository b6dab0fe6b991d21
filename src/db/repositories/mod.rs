//! Repository implementations module.
//!
//! This module contains implementations of the repository traits:
//! - `local`: In-memory implementation for unit testing and local development
//!
//! A SQL-backed implementation can be added behind a feature flag; the
//! service layer only ever sees `dyn FullRepository`.
pub mod local;

pub use local::LocalRepository;
