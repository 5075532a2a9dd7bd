/// Error types for leaderboard-service
use thiserror::Error;

use crate::codec::CodecError;
use crate::repository::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or out-of-range caller input. Surfaced verbatim, never
    /// retried, and always reported before any store call is attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying store call failed or timed out. Retry policy belongs
    /// to the caller; the service performs no implicit retry.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ServiceError {
    /// Whether the caller may reasonably retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::StoreUnavailable(_))
    }
}

/// Codec failures on the write path are validation failures: the score the
/// caller supplied cannot be represented, including fixed-width overflow.
impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
