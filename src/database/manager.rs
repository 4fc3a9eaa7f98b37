use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),

    /// Unique constraint violation, message as reported by the store
    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        // 23505 = unique_violation
        let unique_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23505")
            .unwrap_or(false);
        if unique_violation {
            DatabaseError::Conflict(err.as_database_error().map(|db| db.message().to_string()).unwrap_or_default())
        } else {
            DatabaseError::Sqlx(err)
        }
    }
}

impl From<crate::filter::FilterError> for DatabaseError {
    fn from(err: crate::filter::FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

impl DatabaseError {
    /// True when the store itself could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
        )
    }
}

const BUILDING_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS "storied_building" (
    "id"         BIGSERIAL PRIMARY KEY,
    "created"    TIMESTAMPTZ NOT NULL DEFAULT now(),
    "modified"   TIMESTAMPTZ NOT NULL DEFAULT now(),
    "name"       VARCHAR(32) NOT NULL UNIQUE,
    "floors"     INTEGER NOT NULL,
    "height"     INTEGER NOT NULL,
    "area"       INTEGER NOT NULL,
    "build_date" DATE NOT NULL,
    "remark"     VARCHAR(200)
)
"#;

/// Connection pool construction and one-time schema registration
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect using `DATABASE_URL`, optionally swapping its database path
    /// for `DATABASE_NAME`.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let base = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = match std::env::var("DATABASE_NAME") {
            Ok(name) if !name.is_empty() => Self::build_connection_string(&base, &name)?,
            _ => base,
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidDatabaseName(database_name.to_string()));
        }
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        // Replace the path to the database name (ensure leading slash)
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Register the building table. Runs once at start-up, before the pool
    /// is handed to the repository.
    pub async fn register_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(BUILDING_TABLE_DDL).execute(pool).await?;
        info!("Registered table storied_building");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }

    /// Database names are plain identifiers: `[A-Za-z_][A-Za-z0-9_]*`
    fn is_valid_db_name(name: &str) -> bool {
        let mut chars = name.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
