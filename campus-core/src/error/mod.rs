//! Unified error handling for Campus Core

use crate::store::StoreError;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// Storage-backed variants carry a generic user-facing message; the wrapped
/// `StoreError` is kept as the source for logging.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Carries the rejected domain
    #[error("Invalid domain format. Example: tint.edu.in")]
    InvalidFormat(String),

    /// Carries the duplicate domain
    #[error("This domain already exists")]
    DuplicateDomain(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage is unavailable. Please try again.")]
    StorageUnavailable(#[source] StoreError),

    #[error("{message}")]
    LoadFailed {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to remove domain. Please try again")]
    RemoveFailed(#[source] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether re-invoking the operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::StorageUnavailable(_)
                | AppError::LoadFailed { .. }
                | AppError::RemoveFailed(_)
        )
    }
}

// Conversion from validation errors: surface the first user-facing message,
// preferring "missing field" over format problems.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let all: Vec<&validator::ValidationError> =
            field_errors.values().flat_map(|errs| errs.iter()).collect();

        let message = all
            .iter()
            .find(|e| e.code == "blank")
            .or_else(|| all.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| errors.to_string());

        AppError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateStallInput, MSG_FILL_ALL_FIELDS, MSG_INVALID_EMAIL};
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("College c1 not found".to_string());
        assert_eq!(err.to_string(), "Not found: College c1 not found");

        let err = AppError::DuplicateDomain("tint.edu.in".to_string());
        assert_eq!(err.to_string(), "This domain already exists");
    }

    #[test]
    fn test_wrapped_errors_hide_detail() {
        let err = AppError::LoadFailed {
            message: "Failed to load domains. Please try again.",
            source: StoreError::not_found("colleges", "c1"),
        };
        assert_eq!(err.to_string(), "Failed to load domains. Please try again.");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_not_retryable() {
        assert!(!AppError::InvalidFormat("bad_domain".to_string()).is_retryable());
        assert!(!AppError::Validation("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = anyhow::anyhow!("Something went wrong").into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_validation_message_prefers_blank() {
        let input = CreateStallInput {
            name: "".to_string(),
            email: "broken".to_string(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(ref m) if m == MSG_FILL_ALL_FIELDS));

        let input = CreateStallInput {
            name: "Dosa".to_string(),
            email: "broken".to_string(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(ref m) if m == MSG_INVALID_EMAIL));
    }
}
