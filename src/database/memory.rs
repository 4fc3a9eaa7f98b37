use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Building, BuildingFields, BuildingPage, BuildingQuery, NewBuilding};
use crate::database::repository::BuildingRepository;
use crate::filter::Filter;

/// In-process store with the same observable semantics as the PostgreSQL
/// repository, including the unique name constraint.
#[derive(Default)]
pub struct MemoryBuildingRepository {
    table: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Building>,
    last_id: i64,
}

impl Table {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.name == name && Some(row.id) != except)
    }
}

fn duplicate_name(name: &str) -> DatabaseError {
    DatabaseError::Conflict(format!(
        "duplicate key value violates unique constraint \"storied_building_name_key\" (name)=({})",
        name
    ))
}

impl MemoryBuildingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BuildingRepository for MemoryBuildingRepository {
    async fn list(&self, query: &BuildingQuery) -> Result<BuildingPage, DatabaseError> {
        let mut filter = Filter::<Building>::new()?;
        filter.assign(query.to_filter_data())?;

        let table = self.table.read().await;
        let matched: Vec<&Building> = table.rows.values().filter(|row| filter.matches(row)).collect();
        let total = matched.len() as i64;
        let rows = filter.paginate(matched).into_iter().cloned().collect();

        Ok(BuildingPage { total, rows })
    }

    async fn get(&self, id: i64) -> Result<Option<Building>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, building: &NewBuilding) -> Result<i64, DatabaseError> {
        let mut table = self.table.write().await;
        if table.name_taken(&building.name, None) {
            return Err(duplicate_name(&building.name));
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.rows.insert(
            id,
            Building {
                id,
                created: now,
                modified: now,
                name: building.name.clone(),
                floors: building.floors,
                height: building.height,
                area: building.area,
                build_date: building.build_date,
                remark: building.remark.clone(),
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, changes: &BuildingFields) -> Result<u64, DatabaseError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(0);
        }
        if let Some(name) = &changes.name {
            if table.name_taken(name, Some(id)) {
                return Err(duplicate_name(name));
            }
        }

        let Some(row) = table.rows.get_mut(&id) else { return Ok(0) };
        changes.apply_to(row);
        row.modified = Utc::now();
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).map_or(0, |_| 1))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
