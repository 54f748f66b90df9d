//! Catalog Service - ordered level lists for a path

use levelgate_domain::{sort_levels, Level, PathId, SessionContext};
use levelgate_ports::outbound::ApiRequest;

use crate::application::{Api, ServiceError};

#[derive(Clone)]
pub struct CatalogService {
    api: Api,
}

impl CatalogService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// List a path's levels sorted by `order`.
    ///
    /// The sort is stable, so levels sharing an order keep the server's order.
    pub async fn list_levels(
        &self,
        session: &SessionContext,
        path_id: &PathId,
    ) -> Result<Vec<Level>, ServiceError> {
        if path_id.is_blank() {
            return Err(ServiceError::invalid_argument("pathId is required"));
        }

        let request =
            ApiRequest::get(format!("courses/paths/{}/levels", path_id)).bearer(session.token());
        let mut levels: Vec<Level> = self.api.get(request).await?;
        sort_levels(&mut levels);

        tracing::debug!(path_id = %path_id, count = levels.len(), "Loaded path levels");
        Ok(levels)
    }
}
