//! Access Service - the access-check fetcher
//!
//! Calls `GET access/check` for a (path, level, exercise) triple and
//! normalizes every outcome into an [`AccessDecision`]:
//!
//! - 2xx: flags read from `access`, each defaulting to `false`
//! - non-2xx (including 401/403): reason taken from the error body
//! - transport or decoding failure: the fail-closed decision
//!
//! Only a missing `pathId` is reported as an error, and it is reported before
//! any request goes out. There is no caching; every call re-fetches.

use serde_json::Value;

use levelgate_domain::{
    AccessDecision, ExerciseId, LevelId, PathId, Plan, ReasonCode, SessionContext,
};
use levelgate_ports::outbound::{ApiError, ApiRequest};

use crate::application::dto::{AccessCheckResponse, ErrorBody};
use crate::application::{Api, ServiceError};

pub const ACCESS_CHECK_PATH: &str = "access/check";

#[derive(Clone)]
pub struct AccessService {
    api: Api,
}

impl AccessService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Ask the backend whether the session may use a path, level or exercise.
    pub async fn check_access(
        &self,
        session: &SessionContext,
        path_id: &PathId,
        level_id: Option<&LevelId>,
        exercise_id: Option<&ExerciseId>,
    ) -> Result<AccessDecision, ServiceError> {
        if path_id.is_blank() {
            return Err(ServiceError::invalid_argument("pathId is required"));
        }

        let request = ApiRequest::get(ACCESS_CHECK_PATH)
            .query("pathId", path_id.as_str())
            .query_opt(
                "levelId",
                level_id.filter(|id| !id.is_blank()).map(LevelId::as_str),
            )
            .query_opt(
                "exerciseId",
                exercise_id.filter(|id| !id.is_blank()).map(ExerciseId::as_str),
            )
            .bearer(session.token());

        let decision = normalize_access_result(self.api.get_value(request).await);

        tracing::debug!(
            path_id = %path_id,
            level_id = ?level_id.map(LevelId::as_str),
            has_access = decision.has_access(),
            reason = ?decision.reason(),
            source = ?decision.source(),
            "Access check resolved"
        );

        Ok(decision)
    }
}

/// Normalize any access-check outcome into a decision.
pub fn normalize_access_result(result: Result<Value, ApiError>) -> AccessDecision {
    let e = match result {
        Ok(body) => return decision_from_success(body),
        Err(e) => e,
    };

    let Some(status) = e.status() else {
        tracing::warn!(error = %e, "Access check failed, locking content");
        return AccessDecision::fail_closed();
    };

    let reason = e
        .body()
        .map(reason_from_error_body)
        .unwrap_or(ReasonCode::NoAccess);
    if e.is_unauthorized() {
        tracing::info!(status, reason = %reason, "Access check denied by server");
    } else {
        tracing::warn!(
            status,
            reason = %reason,
            "Access check returned an error status, locking content"
        );
    }
    AccessDecision::denied(reason)
}

fn decision_from_success(body: Value) -> AccessDecision {
    let response: AccessCheckResponse = match serde_json::from_value(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable access-check response, locking content");
            return AccessDecision::fail_closed();
        }
    };

    let access = response.access.unwrap_or_default();
    let plans = response
        .available_plans
        .or(access.available_plans)
        .map(parse_plans)
        .unwrap_or_default();

    AccessDecision::new(
        access.has_access.unwrap_or(false),
        access.can_view.unwrap_or(false),
        access.can_interact.unwrap_or(false),
        access.reason.as_deref().and_then(|r| r.parse().ok()),
        access.source,
        plans,
    )
}

fn parse_plans(raw: Vec<Value>) -> Vec<Plan> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<Plan>(value) {
            Ok(plan) => Some(plan),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed plan");
                None
            }
        })
        .collect()
}

/// Extract the denial reason from a non-2xx body.
///
/// Looks at `reason`, then `code`, then `data.reason`, taking the first value
/// that is a known reason code. Defaults to `NoAccess`.
pub fn reason_from_error_body(body: &Value) -> ReasonCode {
    let Ok(body) = serde_json::from_value::<ErrorBody>(body.clone()) else {
        return ReasonCode::NoAccess;
    };

    let reason = body
        .reason_candidates()
        .find_map(|candidate| candidate.parse::<ReasonCode>().ok())
        .unwrap_or(ReasonCode::NoAccess);
    reason
}
