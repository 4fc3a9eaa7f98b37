//! Runs against a live PostgreSQL when `DATABASE_URL` is set (directly or via
//! `.env`); otherwise each test returns early.
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use pms_api_rust::config::config;
use pms_api_rust::database::models::{BuildingFields, BuildingFilter, BuildingQuery, NewBuilding};
use pms_api_rust::database::{BuildingRepository, DatabaseError, DatabaseManager, PgBuildingRepository};

async fn pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL repository test");
        return Ok(None);
    }
    let pool = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::register_schema(&pool).await?;
    Ok(Some(pool))
}

/// Names unique per run so repeated runs against the same database do not collide
fn unique_name(prefix: &str) -> String {
    format!("{}{}", prefix, chrono::Utc::now().timestamp_micros() % 1_000_000_000_000)
}

fn new_building(name: &str) -> NewBuilding {
    NewBuilding {
        name: name.to_string(),
        floors: 10,
        height: 30,
        area: 500,
        build_date: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        remark: Some("lobby 50% done".to_string()),
    }
}

#[tokio::test]
async fn pg_repository_lifecycle() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgBuildingRepository::new(pool);
    let name = unique_name("pg-a-");

    let id = repo.create(&new_building(&name)).await?;
    assert!(id > 0);

    let row = repo.get(id).await?.expect("row was just inserted");
    assert_eq!(row.name, name);
    assert_eq!(row.build_date, NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"));
    assert_eq!(row.remark.as_deref(), Some("lobby 50% done"));

    let filter = BuildingFilter { name: Some(name.clone()), floors: Some(10), ..Default::default() };
    let page = repo.list(&BuildingQuery::new(1, 10, "-BuildDate", filter)).await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].id, id);

    let changes = BuildingFields { floors: Some(12), ..Default::default() };
    assert_eq!(repo.update(id, &changes).await?, 1);
    let after = repo.get(id).await?.expect("row still exists");
    assert_eq!(after.floors, 12);
    assert_eq!(after.height, 30);
    assert_eq!(after.created, row.created);
    assert!(after.modified >= row.modified);

    assert_eq!(repo.delete(id).await?, 1);
    assert!(repo.get(id).await?.is_none());
    assert_eq!(repo.delete(id).await?, 0);
    assert_eq!(repo.update(id, &changes).await?, 0);
    Ok(())
}

#[tokio::test]
async fn pg_unique_violation_is_conflict() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgBuildingRepository::new(pool);
    let name = unique_name("pg-b-");

    let id = repo.create(&new_building(&name)).await?;
    let err = repo.create(&new_building(&name)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "unexpected error: {:?}", err);

    let other = unique_name("pg-c-");
    let other_id = repo.create(&new_building(&other)).await?;
    let rename = BuildingFields { name: Some(name.clone()), ..Default::default() };
    let err = repo.update(other_id, &rename).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "unexpected error: {:?}", err);

    repo.delete(id).await?;
    repo.delete(other_id).await?;
    Ok(())
}

#[tokio::test]
async fn pg_name_filter_treats_wildcards_literally() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgBuildingRepository::new(pool);
    let name = unique_name("pg-d-");
    let id = repo.create(&new_building(&name)).await?;

    let filter = BuildingFilter { name: Some(format!("{}%", &name[..5])), ..Default::default() };
    let page = repo.list(&BuildingQuery::new(1, 10, "Id", filter)).await?;
    assert!(page.rows.iter().all(|row| row.id != id));

    repo.delete(id).await?;
    Ok(())
}
