//! HTTP adapter for the backend REST API
//!
//! Every request carries an `x-request-id` so server logs can be matched to
//! client logs. Non-2xx responses are returned as `ApiError::Http` with the
//! JSON body attached when the server sent one; the services decide what a
//! status means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use levelgate_app::application::ClientConfig;
use levelgate_ports::outbound::{ApiError, ApiRequest, RawApiPort};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct HttpApiAdapter {
    client: Client,
    base_url: Url,
}

impl HttpApiAdapter {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_timeout(
            &config.api_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // A trailing slash keeps the last base segment when joining
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl RawApiPort for HttpApiAdapter {
    async fn get_json(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.endpoint(&request.path)?;
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .client
            .get(url)
            .query(&request.query)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                path = %request.path,
                error = %e,
                "Request failed"
            );
            ApiError::transport(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            tracing::debug!(
                request_id = %request_id,
                path = %request.path,
                status = status.as_u16(),
                "Server returned error status"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: serde_json::from_str(&text).ok(),
            });
        }

        serde_json::from_str(&text).map_err(ApiError::parse)
    }
}
