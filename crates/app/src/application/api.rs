//! Typed API wrapper for application services.
//!
//! The composition root stores an object-safe `RawApiPort` implementation so
//! services never depend on adapter types. `Api` wraps the `Arc<dyn RawApiPort>`
//! and does the serde_json conversions.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use levelgate_ports::outbound::{ApiError, ApiRequest, RawApiPort};

#[derive(Clone)]
pub struct Api {
    raw: Arc<dyn RawApiPort>,
}

impl Api {
    pub fn new(raw: Arc<dyn RawApiPort>) -> Self {
        Self { raw }
    }

    pub async fn get<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.raw.get_json(request).await?;
        serde_json::from_value(value).map_err(ApiError::parse)
    }

    /// Untyped body, for responses whose shape must be normalized by hand
    pub async fn get_value(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.raw.get_json(request).await
    }
}
