use sqlx::{self, postgres::{PgArguments, PgRow}, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, FilterRecord, FilterValue, FilterWhereInfo, SqlResult};

pub struct QueryBuilder<T> {
    filter: Filter<T>,
}

impl<T> QueryBuilder<T>
where
    T: FilterRecord + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new() -> Result<Self, DatabaseError> {
        Ok(Self { filter: Filter::new()? })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub fn where_clause(mut self, conditions: Vec<FilterWhereInfo>) -> Result<Self, DatabaseError> {
        self.filter.where_clause(conditions)?;
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        log_sql(&sql_result);
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        log_sql(&sql_result);
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql()?;
        log_sql(&sql_result);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Insert a row and return its generated key.
    pub async fn insert(self, pool: &PgPool, values: &[(&'static str, FilterValue)]) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_insert_sql(values)?;
        log_sql(&sql_result);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let id: i64 = row.try_get(T::KEY)?;
        Ok(id)
    }

    /// Returns the number of rows affected.
    pub async fn update(self, pool: &PgPool, assignments: &[(&'static str, FilterValue)]) -> Result<u64, DatabaseError> {
        let sql_result = self.filter.to_update_sql(assignments)?;
        execute(pool, &sql_result).await
    }

    /// Returns the number of rows affected.
    pub async fn delete(self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let sql_result = self.filter.to_delete_sql()?;
        execute(pool, &sql_result).await
    }
}

async fn execute(pool: &PgPool, sql_result: &SqlResult) -> Result<u64, DatabaseError> {
    log_sql(sql_result);
    let mut q = sqlx::query(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query(q, p);
    }
    let done = q.execute(pool).await?;
    Ok(done.rows_affected())
}

fn log_sql(sql_result: &SqlResult) {
    if crate::config::CONFIG.database.enable_query_logging {
        tracing::debug!(params = sql_result.params.len(), "SQL: {}", sql_result.query);
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q FilterValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        FilterValue::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        FilterValue::Int(i) => q.bind(*i),
        FilterValue::BigInt(i) => q.bind(*i),
        FilterValue::Text(s) => q.bind(s.as_str()),
        FilterValue::Date(d) => q.bind(*d),
        FilterValue::Timestamp(t) => q.bind(*t),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q FilterValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        FilterValue::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        FilterValue::Int(i) => q.bind(*i),
        FilterValue::BigInt(i) => q.bind(*i),
        FilterValue::Text(s) => q.bind(s.as_str()),
        FilterValue::Date(d) => q.bind(*d),
        FilterValue::Timestamp(t) => q.bind(*t),
    }
}
