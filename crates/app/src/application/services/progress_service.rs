//! Progress Service - per-level completion tracker
//!
//! Fans out one progress request per level and collects the levels whose
//! exercises are all completed. This backs a progress display, not a security
//! boundary, so a failed level is logged and left out rather than failing the
//! whole set.

use futures_util::future::join_all;

use levelgate_domain::{CompletedLevelSet, LevelId, LevelProgress, SessionContext, UserId};
use levelgate_ports::outbound::ApiRequest;

use crate::application::Api;

#[derive(Clone)]
pub struct ProgressService {
    api: Api,
}

impl ProgressService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Levels the user has fully completed.
    ///
    /// Anonymous users (no `user_id`) have completed nothing; no requests are
    /// made for them.
    pub async fn get_completed_levels(
        &self,
        session: &SessionContext,
        user_id: Option<&UserId>,
        level_ids: &[LevelId],
    ) -> CompletedLevelSet {
        let Some(user_id) = user_id.filter(|id| !id.is_blank()) else {
            return CompletedLevelSet::new();
        };

        let fetches = level_ids
            .iter()
            .filter(|id| !id.is_blank())
            .map(|level_id| self.fetch_progress(session, user_id, level_id));

        let completed: CompletedLevelSet = join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .filter(|(_, progress)| progress.is_complete())
            .map(|(level_id, _)| level_id)
            .collect();

        tracing::debug!(
            user_id = %user_id,
            requested = level_ids.len(),
            completed = completed.len(),
            "Completed levels derived"
        );

        completed
    }

    async fn fetch_progress(
        &self,
        session: &SessionContext,
        user_id: &UserId,
        level_id: &LevelId,
    ) -> Option<(LevelId, LevelProgress)> {
        let request = ApiRequest::get(progress_path(user_id, level_id)).bearer(session.token());

        match self.api.get::<LevelProgress>(request).await {
            Ok(progress) => Some((level_id.clone(), progress)),
            Err(e) => {
                tracing::warn!(
                    level_id = %level_id,
                    error = %e,
                    "Failed to fetch level progress, treating as not completed"
                );
                None
            }
        }
    }
}

pub fn progress_path(user_id: &UserId, level_id: &LevelId) -> String {
    format!("courses/users/{}/levels/{}/progress", user_id, level_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelgate_ports::outbound::{ApiError, MockRawApiPort};
    use serde_json::json;
    use std::sync::Arc;

    fn session() -> SessionContext {
        SessionContext::new(Some("jwt".into()), Some(UserId::new("u1")), None)
    }

    fn ids(raw: &[&str]) -> Vec<LevelId> {
        raw.iter().map(|id| LevelId::new(*id)).collect()
    }

    #[tokio::test]
    async fn test_includes_only_fully_completed_levels() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().returning(|req| {
            Ok(match req.path.as_str() {
                "courses/users/u1/levels/L0/progress" => {
                    json!({ "completedExercises": 4, "totalExercises": 4 })
                }
                "courses/users/u1/levels/L1/progress" => {
                    json!({ "completedExercises": 2, "totalExercises": 4 })
                }
                _ => json!({ "completedExercises": 0, "totalExercises": 0 }),
            })
        });

        let service = ProgressService::new(Api::new(Arc::new(mock)));
        let user = UserId::new("u1");
        let completed = service
            .get_completed_levels(&session(), Some(&user), &ids(&["L0", "L1", "L2"]))
            .await;

        assert_eq!(completed.len(), 1);
        assert!(completed.contains(&LevelId::new("L0")));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_sink_the_others() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().times(3).returning(|req| {
            if req.path.contains("/L2/") {
                Err(ApiError::transport("connection reset"))
            } else {
                Ok(json!({ "completedExercises": 3, "totalExercises": 3 }))
            }
        });

        let service = ProgressService::new(Api::new(Arc::new(mock)));
        let user = UserId::new("u1");
        let completed = service
            .get_completed_levels(&session(), Some(&user), &ids(&["L1", "L2", "L3"]))
            .await;

        assert!(completed.contains(&LevelId::new("L1")));
        assert!(!completed.contains(&LevelId::new("L2")));
        assert!(completed.contains(&LevelId::new("L3")));
    }

    #[tokio::test]
    async fn test_malformed_progress_is_excluded() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json()
            .returning(|_| Ok(json!({ "completedExercises": "all" })));

        let service = ProgressService::new(Api::new(Arc::new(mock)));
        let user = UserId::new("u1");
        let completed = service
            .get_completed_levels(&session(), Some(&user), &ids(&["L0"]))
            .await;
        assert!(completed.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_user_gets_empty_set_without_requests() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json().times(0);

        let service = ProgressService::new(Api::new(Arc::new(mock)));
        let completed = service
            .get_completed_levels(&SessionContext::anonymous(), None, &ids(&["L0", "L1"]))
            .await;
        assert!(completed.is_empty());
    }
}
