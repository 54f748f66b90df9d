//! Request and error types for the REST API boundary

use serde_json::Value;

/// Errors surfaced by a `RawApiPort` implementation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (unreachable, timeout, TLS)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    ///
    /// `body` holds the parsed JSON error body when there was one.
    #[error("HTTP error {status}")]
    Http { status: u16, body: Option<Value> },

    /// A 2xx response whose body could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The request path could not be joined onto the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn transport(msg: impl ToString) -> Self {
        Self::Transport(msg.to_string())
    }

    pub fn parse(msg: impl ToString) -> Self {
        Self::ParseError(msg.to_string())
    }

    /// HTTP status, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed JSON error body, when the server sent one
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// A GET request against the backend
///
/// Paths are relative to the configured API base URL (no leading slash
/// required). The bearer token comes from the caller's session context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            bearer_token: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Adds the parameter only when a value is present
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer_token = token.map(str::to_string);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
