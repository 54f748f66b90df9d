//! Access-check response shapes
//!
//! Success (2xx):
//! `{ "access": { hasAccess, canView, canInteract, reason, source }, "availablePlans": [...] }`
//!
//! Failure (non-2xx), any of:
//! `{ "reason": .. }`, `{ "code": .. }`, `{ "data": { "reason": .. } }`, each
//! optionally with a `message`.

use serde::Deserialize;
use serde_json::Value;

use levelgate_domain::AccessSource;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPayload {
    #[serde(default)]
    pub has_access: Option<bool>,
    #[serde(default)]
    pub can_view: Option<bool>,
    #[serde(default)]
    pub can_interact: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub source: Option<AccessSource>,
    /// Some endpoints nest the plans inside `access`
    #[serde(default)]
    pub available_plans: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckResponse {
    #[serde(default)]
    pub access: Option<AccessPayload>,
    /// Kept untyped so one malformed plan does not sink the whole decision
    #[serde(default)]
    pub available_plans: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub reason: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub reason: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub data: Option<ErrorData>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Reason candidates in priority order: `reason`, `code`, `data.reason`
    pub fn reason_candidates(&self) -> impl Iterator<Item = &str> {
        [
            self.reason.as_ref(),
            self.code.as_ref(),
            self.data.as_ref().and_then(|d| d.reason.as_ref()),
        ]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
    }
}
