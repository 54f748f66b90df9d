//! Raw API Port - Object-safe HTTP boundary
//!
//! Adapters exchange untyped JSON; the application layer's `Api` wrapper does
//! the serde conversions on top, so services never see adapter types.

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, ApiRequest};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RawApiPort: Send + Sync {
    /// Perform a GET and return the decoded JSON body.
    ///
    /// Non-2xx responses must come back as `ApiError::Http` with the JSON error
    /// body attached when the server sent one.
    async fn get_json(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
