//! Level Gate - joins access and progress into a renderable path view
//!
//! The access check and the progress fan-out run concurrently; the resolver
//! only runs once both have finished. If the owner cancels while either is
//! outstanding, both results are dropped and nothing is returned.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use levelgate_domain::{
    classify, describe, resolve, sort_levels, AccessDecision, CompletedLevelSet, DenialMessage,
    ExerciseId, Level, LevelId, LevelMode, LevelViewState, PathId, SessionContext, UnlockState,
};

use super::cancel::until_cancelled;
use super::{AccessService, ProgressService};
use crate::application::{Api, ServiceError};

/// One level as the UI should render it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelView {
    pub level: Level,
    pub state: UnlockState,
    pub mode: LevelMode,
}

/// Everything needed to render a path's level list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathUnlockView {
    pub path_id: PathId,
    pub decision: AccessDecision,
    pub completed: CompletedLevelSet,
    pub levels: Vec<LevelView>,
    /// Set when the path itself is denied
    pub denial: Option<DenialMessage>,
}

impl PathUnlockView {
    pub fn unlocked_count(&self) -> usize {
        self.levels.iter().filter(|l| l.state.is_unlocked()).count()
    }
}

/// Outcome of a single level check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCheck {
    pub state: LevelViewState,
    pub decision: AccessDecision,
    pub denial: Option<DenialMessage>,
}

#[derive(Clone)]
pub struct LevelGate {
    access: AccessService,
    progress: ProgressService,
}

impl LevelGate {
    pub fn new(api: Api) -> Self {
        Self {
            access: AccessService::new(api.clone()),
            progress: ProgressService::new(api),
        }
    }

    /// Resolve every level of a path for the session.
    pub async fn load_path(
        &self,
        session: &SessionContext,
        path_id: &PathId,
        mut levels: Vec<Level>,
        cancel: &CancellationToken,
    ) -> Result<PathUnlockView, ServiceError> {
        if path_id.is_blank() {
            return Err(ServiceError::invalid_argument("pathId is required"));
        }

        sort_levels(&mut levels);
        let level_ids: Vec<LevelId> = levels.iter().map(|level| level.id.clone()).collect();

        let fetches = async {
            futures_util::join!(
                self.access.check_access(session, path_id, None, None),
                self.progress
                    .get_completed_levels(session, session.user_id(), &level_ids),
            )
        };

        let Some((decision, completed)) = until_cancelled(cancel, fetches).await else {
            tracing::debug!(path_id = %path_id, "Path load cancelled in flight");
            return Err(ServiceError::Cancelled);
        };
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        let decision = decision?;

        let unlocks = resolve(&levels, &completed, &decision);
        let modes = classify(&levels, &completed, &decision);
        let levels: Vec<LevelView> = levels
            .into_iter()
            .zip(unlocks.iter().zip(modes.iter()))
            .map(|(level, ((_, state), (_, mode)))| LevelView {
                level,
                state: *state,
                mode: *mode,
            })
            .collect();

        let denial = path_denial(&decision);
        let view = PathUnlockView {
            path_id: path_id.clone(),
            decision,
            completed,
            levels,
            denial,
        };

        tracing::info!(
            path_id = %path_id,
            levels = view.levels.len(),
            unlocked = view.unlocked_count(),
            completed = view.completed.len(),
            "Path resolved"
        );

        Ok(view)
    }

    /// Check one level, running the view state machine from `Checking`.
    pub async fn check_level(
        &self,
        session: &SessionContext,
        path_id: &PathId,
        level_id: &LevelId,
        exercise_id: Option<&ExerciseId>,
        cancel: &CancellationToken,
    ) -> Result<LevelCheck, ServiceError> {
        self.run_check(
            LevelViewState::Checking,
            session,
            path_id,
            level_id,
            exercise_id,
            cancel,
        )
        .await
    }

    /// Re-run a check after an error. Any other prior state is rejected.
    pub async fn retry_level(
        &self,
        previous: LevelViewState,
        session: &SessionContext,
        path_id: &PathId,
        level_id: &LevelId,
        exercise_id: Option<&ExerciseId>,
        cancel: &CancellationToken,
    ) -> Result<LevelCheck, ServiceError> {
        let state = previous.retry()?;
        self.run_check(state, session, path_id, level_id, exercise_id, cancel)
            .await
    }

    async fn run_check(
        &self,
        state: LevelViewState,
        session: &SessionContext,
        path_id: &PathId,
        level_id: &LevelId,
        exercise_id: Option<&ExerciseId>,
        cancel: &CancellationToken,
    ) -> Result<LevelCheck, ServiceError> {
        if level_id.is_blank() {
            return Err(ServiceError::invalid_argument("levelId is required"));
        }

        let check = self
            .access
            .check_access(session, path_id, Some(level_id), exercise_id);
        let Some(decision) = until_cancelled(cancel, check).await else {
            return Err(ServiceError::Cancelled);
        };
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        let decision = decision?;

        let state = state.apply_decision(&decision)?;
        let denial = state.denial_reason().map(|reason| *describe(Some(reason)));

        tracing::debug!(
            path_id = %path_id,
            level_id = %level_id,
            state = state.name(),
            "Level check finished"
        );

        Ok(LevelCheck {
            state,
            decision,
            denial,
        })
    }
}

fn path_denial(decision: &AccessDecision) -> Option<DenialMessage> {
    if decision.permits_viewing() {
        None
    } else {
        Some(*describe(decision.reason()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelgate_domain::{AccessSource, PrimaryAction, ReasonCode, UserId};
    use levelgate_ports::outbound::{ApiError, MockRawApiPort};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn session() -> SessionContext {
        SessionContext::new(Some("jwt".into()), Some(UserId::new("u1")), None)
    }

    fn path_levels() -> Vec<Level> {
        // Deliberately out of order; the gate sorts by `order`
        vec![Level::new("L2", 2), Level::new("L0", 0), Level::new("L1", 1)]
    }

    /// Serves the access check from `access` and marks only L0 completed
    fn backend(access: Result<Value, ApiError>) -> MockRawApiPort {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().returning(move |req| {
            if req.path == "access/check" {
                return access.clone();
            }
            Ok(if req.path.contains("/levels/L0/") {
                json!({ "completedExercises": 5, "totalExercises": 5 })
            } else {
                json!({ "completedExercises": 0, "totalExercises": 5 })
            })
        });
        mock
    }

    fn gate(mock: MockRawApiPort) -> LevelGate {
        LevelGate::new(Api::new(Arc::new(mock)))
    }

    fn states(view: &PathUnlockView) -> Vec<(&str, UnlockState)> {
        view.levels
            .iter()
            .map(|l| (l.level.id.as_str(), l.state))
            .collect()
    }

    #[tokio::test]
    async fn test_subscriber_unlocks_through_next_level() {
        let mock = backend(Ok(json!({
            "access": {
                "hasAccess": true,
                "canView": true,
                "canInteract": true,
                "source": "subscription"
            }
        })));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            states(&view),
            vec![
                ("L0", UnlockState::Unlocked),
                ("L1", UnlockState::Unlocked),
                ("L2", UnlockState::Locked),
            ]
        );
        assert_eq!(view.levels[1].mode, LevelMode::Interactive);
        assert!(view.denial.is_none());
    }

    #[tokio::test]
    async fn test_denied_path_locks_everything_and_offers_subscribe() {
        let mock = backend(Err(ApiError::Http {
            status: 403,
            body: Some(json!({ "reason": "no_access" })),
        }));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(view.unlocked_count(), 0);
        let denial = view.denial.unwrap();
        assert_eq!(denial.primary_action, PrimaryAction::Subscribe);
    }

    #[tokio::test]
    async fn test_login_required_offers_login() {
        let mock = backend(Err(ApiError::Http {
            status: 401,
            body: Some(json!({ "code": "login_required" })),
        }));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(view.decision.reason(), Some(ReasonCode::LoginRequired));
        assert_eq!(view.denial.unwrap().primary_action, PrimaryAction::Login);
    }

    #[tokio::test]
    async fn test_admin_sees_every_level() {
        let mock = backend(Ok(json!({ "access": { "hasAccess": true, "source": "admin" } })));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(view.decision.source(), Some(AccessSource::Admin));
        assert_eq!(view.unlocked_count(), 3);
        assert!(view.levels.iter().all(|l| l.mode == LevelMode::Interactive));
    }

    #[tokio::test]
    async fn test_grant_that_cannot_be_viewed_stays_locked() {
        let mock = backend(Ok(json!({
            "access": { "hasAccess": true, "canView": false, "source": "subscription" }
        })));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(view.levels.iter().all(|l| l.mode == LevelMode::Locked));
        assert!(view.denial.is_some());
    }

    #[tokio::test]
    async fn test_network_failure_locks_path_with_warning() {
        let mock = backend(Err(ApiError::transport("connection refused")));

        let view = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(view.decision.is_error());
        assert_eq!(view.unlocked_count(), 0);
        assert!(view.denial.is_some());
    }

    #[tokio::test]
    async fn test_cancel_before_start_sends_nothing() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().times(0);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &cancel)
            .await;
        assert!(matches!(result, Err(ServiceError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_during_fetch_discards_results() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().returning(move |_| {
            trigger.cancel();
            Ok(json!({ "access": { "hasAccess": true, "canView": true, "canInteract": true } }))
        });

        let result = gate(mock)
            .load_path(&session(), &PathId::new("p1"), path_levels(), &cancel)
            .await;
        assert!(matches!(result, Err(ServiceError::Cancelled)));
    }

    #[tokio::test]
    async fn test_blank_path_is_rejected() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().times(0);

        let result = gate(mock)
            .load_path(&session(), &PathId::new(""), path_levels(), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_check_level_denied_by_progression() {
        let mock = backend(Err(ApiError::Http {
            status: 403,
            body: Some(json!({ "data": { "reason": "previous_level_not_completed" } })),
        }));

        let check = gate(mock)
            .check_level(
                &session(),
                &PathId::new("p1"),
                &LevelId::new("L2"),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            check.state,
            LevelViewState::AccessDenied {
                reason: ReasonCode::PreviousLevelNotCompleted,
                can_view: false,
            }
        );
        assert_eq!(check.denial.unwrap().primary_action, PrimaryAction::GoBack);
    }

    #[tokio::test]
    async fn test_check_level_preview_grant() {
        let mock = backend(Ok(json!({
            "access": {
                "hasAccess": true,
                "canView": true,
                "canInteract": false,
                "source": "preview"
            }
        })));

        let check = gate(mock)
            .check_level(
                &session(),
                &PathId::new("p1"),
                &LevelId::new("L0"),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(check.state, LevelViewState::AccessGranted { interactive: false });
        assert!(check.denial.is_none());
    }

    #[tokio::test]
    async fn test_retry_only_from_error() {
        let mock = backend(Ok(json!({
            "access": { "hasAccess": true, "canView": true, "canInteract": true }
        })));
        let gate = gate(mock);
        let path = PathId::new("p1");
        let level = LevelId::new("L0");

        let retried = gate
            .retry_level(
                LevelViewState::Error,
                &session(),
                &path,
                &level,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(retried.state, LevelViewState::AccessGranted { interactive: true });

        let rejected = gate
            .retry_level(
                retried.state,
                &session(),
                &path,
                &level,
                None,
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(rejected, Err(ServiceError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_check_level_error_state_on_transport_failure() {
        let mock = backend(Err(ApiError::transport("dns failure")));

        let check = gate(mock)
            .check_level(
                &session(),
                &PathId::new("p1"),
                &LevelId::new("L0"),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(check.state, LevelViewState::Error);
        assert_eq!(check.denial.map(|d| d.primary_action), Some(PrimaryAction::Subscribe));
    }
}
