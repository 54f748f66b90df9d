//! Client configuration
//!
//! Read from the environment (the runner loads `.env` first):
//!
//! | Variable                       | Default                      |
//! |--------------------------------|------------------------------|
//! | `LEVELGATE_API_URL`            | `http://localhost:5000/api`  |
//! | `LEVELGATE_REQUEST_TIMEOUT_MS` | `30000`                      |
//! | `LEVELGATE_STORAGE_PATH`       | per-user config directory    |

use std::path::PathBuf;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default request timeout in milliseconds (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout_ms: u64,
    /// Overrides the storage file location
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            storage_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank and unparseable values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_blank("LEVELGATE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let request_timeout_ms = non_blank("LEVELGATE_REQUEST_TIMEOUT_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        let storage_path = non_blank("LEVELGATE_STORAGE_PATH").map(PathBuf::from);

        Self {
            api_url,
            request_timeout_ms,
            storage_path,
        }
    }
}
