//! Service layer error types
//!
//! Most failures in this layer are normalized into values (a fail-closed
//! decision, a level missing from the completed set). What remains is caller
//! misuse, cancellation, and API errors from calls that are not a security
//! boundary.

use levelgate_domain::DomainError;
use levelgate_ports::outbound::ApiError;

/// Errors that can occur in service operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// A required identifier was missing; raised before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The owner of the operation cancelled it; no result was committed
    #[error("Operation cancelled")]
    Cancelled,
}

/// Domain errors reaching a service are caller misuse (a retry outside the
/// error state, an unparseable identifier).
impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        ServiceError::InvalidArgument(e.to_string())
    }
}

impl ServiceError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(msg.into())
    }

    /// Check if this is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServiceError::Cancelled)
    }
}
