use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Building, BuildingFields, BuildingPage, BuildingQuery, NewBuilding};
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterValue, FilterWhereInfo};

/// Storage for storied buildings.
///
/// Implementations perform no validation; callers hand in already validated
/// input (see `BuildingService`).
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    /// One page of matching rows plus the total match count, which ignores the page window.
    async fn list(&self, query: &BuildingQuery) -> Result<BuildingPage, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Building>, DatabaseError>;

    /// Insert and return the generated identifier.
    async fn create(&self, building: &NewBuilding) -> Result<i64, DatabaseError>;

    /// Apply the supplied fields and bump the modification time.
    /// Returns the number of rows affected (0 when `id` does not exist).
    async fn update(&self, id: i64, changes: &BuildingFields) -> Result<u64, DatabaseError>;

    /// Returns the number of rows affected (0 when `id` does not exist).
    async fn delete(&self, id: i64) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL-backed repository
pub struct PgBuildingRepository {
    pool: PgPool,
}

impl PgBuildingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn by_id(id: i64) -> Vec<FilterWhereInfo> {
    vec![FilterWhereInfo::eq("id", id)]
}

#[async_trait]
impl BuildingRepository for PgBuildingRepository {
    async fn list(&self, query: &BuildingQuery) -> Result<BuildingPage, DatabaseError> {
        let filter_data = query.to_filter_data();

        let rows = QueryBuilder::<Building>::new()?
            .filter(filter_data.clone())?
            .select_all(&self.pool)
            .await?;

        let total = QueryBuilder::<Building>::new()?
            .filter(filter_data)?
            .count(&self.pool)
            .await?;

        Ok(BuildingPage { total, rows })
    }

    async fn get(&self, id: i64) -> Result<Option<Building>, DatabaseError> {
        QueryBuilder::<Building>::new()?
            .where_clause(by_id(id))?
            .select_optional(&self.pool)
            .await
    }

    async fn create(&self, building: &NewBuilding) -> Result<i64, DatabaseError> {
        let now = FilterValue::from(Utc::now());
        let mut values = building.assignments();
        values.push(("created", now.clone()));
        values.push(("modified", now));

        QueryBuilder::<Building>::new()?
            .insert(&self.pool, &values)
            .await
    }

    async fn update(&self, id: i64, changes: &BuildingFields) -> Result<u64, DatabaseError> {
        let mut assignments = changes.assignments();
        assignments.push(("modified", Utc::now().into()));

        QueryBuilder::<Building>::new()?
            .where_clause(by_id(id))?
            .update(&self.pool, &assignments)
            .await
    }

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        QueryBuilder::<Building>::new()?
            .where_clause(by_id(id))?
            .delete(&self.pool)
            .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
