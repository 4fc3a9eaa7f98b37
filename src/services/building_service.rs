use std::sync::Arc;

use tracing::{debug, warn};

use crate::database::manager::DatabaseError;
use crate::database::models::{BuildingFields, BuildingPage, BuildingQuery, ValidationErrors};
use crate::database::repository::BuildingRepository;

#[derive(Debug, thiserror::Error)]
pub enum BuildingError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("update field is empty")]
    EmptyUpdate,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Validation and partial-update rules in front of a [`BuildingRepository`].
pub struct BuildingService {
    repository: Arc<dyn BuildingRepository>,
}

impl BuildingService {
    pub fn new(repository: Arc<dyn BuildingRepository>) -> Self {
        Self { repository }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &Arc<dyn BuildingRepository> {
        &self.repository
    }

    /// List one page of buildings together with the total match count
    pub async fn list(&self, query: &BuildingQuery) -> Result<BuildingPage, BuildingError> {
        let page = self.repository.list(query).await?;
        debug!(
            page = query.pagination.page,
            rows = page.rows.len(),
            total = page.total,
            sort = %query.sort,
            "Listed buildings"
        );
        Ok(page)
    }

    /// Validate and insert a new building, returning its identifier.
    ///
    /// Validation runs before the store is touched; identifiers and
    /// timestamps are always assigned by the store.
    pub async fn create(&self, fields: BuildingFields) -> Result<i64, BuildingError> {
        let building = fields.validate_new().map_err(|e| {
            warn!("Rejected building create: {}", e);
            e
        })?;
        let id = self.repository.create(&building).await?;
        debug!(id, name = %building.name, "Created building");
        Ok(id)
    }

    /// Apply the supplied fields to building `id`.
    ///
    /// Returns the number of rows affected; 0 means no such building.
    pub async fn update(&self, id: i64, fields: BuildingFields) -> Result<u64, BuildingError> {
        fields.validate_changes().map_err(|e| {
            warn!(id, "Rejected building update: {}", e);
            e
        })?;
        if fields.is_empty() {
            return Err(BuildingError::EmptyUpdate);
        }
        let affected = self.repository.update(id, &fields).await?;
        debug!(id, affected, "Updated building");
        Ok(affected)
    }

    /// Returns the number of rows affected; 0 means no such building.
    pub async fn delete(&self, id: i64) -> Result<u64, BuildingError> {
        let affected = self.repository.delete(id).await?;
        debug!(id, affected, "Deleted building");
        Ok(affected)
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.repository.health_check().await
    }
}
