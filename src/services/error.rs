//! Service-level error taxonomy.
//!
//! Four client-facing categories plus a passthrough for storage failures.
//! All are synchronous and never retried automatically; side-effect failures
//! (notifications) are logged by callers and never surface here.

use crate::db::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, SchedulingError>;

/// Error type for the scheduling services.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Malformed or out-of-range input, or a business-rule violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested interval overlaps an existing active booking. A distinct
    /// category so callers can offer "pick another time".
    #[error("time conflict: {0}")]
    Conflict(String),

    /// Unknown provider, booking, or plan.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requester is not a party to the resource, or not its owner.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Storage failure unrelated to the request's content.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SchedulingError {
    /// Map storage errors into the service taxonomy. Conflict and not-found
    /// results from conditional writes keep their category; everything else
    /// is a repository failure.
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { ref message, .. } => Self::Conflict(message.clone()),
            RepositoryError::NotFound { ref message, .. } => Self::NotFound(message.clone()),
            other => Self::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_conflict_becomes_conflict() {
        let err: SchedulingError = RepositoryError::conflict("overlap at 10:00-10:30").into();
        assert!(matches!(err, SchedulingError::Conflict(_)));
        assert!(err.to_string().contains("10:00-10:30"));
    }

    #[test]
    fn repository_not_found_keeps_category() {
        let err: SchedulingError = RepositoryError::not_found("booking missing").into();
        assert!(matches!(err, SchedulingError::NotFound(_)));
    }

    #[test]
    fn other_repository_errors_pass_through() {
        let err: SchedulingError = RepositoryError::internal("disk on fire").into();
        assert!(matches!(err, SchedulingError::Repository(_)));
    }
}
