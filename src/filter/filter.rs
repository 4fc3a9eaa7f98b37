use std::cmp::Ordering;
use std::marker::PhantomData;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{validate_identifier, FilterWhere};
use super::types::{FilterData, FilterOrderInfo, FilterRecord, FilterValue, FilterWhereInfo, SqlResult};

pub struct Filter<T> {
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
    _phantom: PhantomData<T>,
}

impl<T: FilterRecord> Filter<T> {
    pub fn new() -> Result<Self, FilterError> {
        Self::validate_table_name(T::TABLE)?;
        Ok(Self {
            where_data: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
            _phantom: PhantomData,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        self.where_clause(data.where_clause)?;
        if let Some(order) = data.order { self.order(&order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Vec<FilterWhereInfo>) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = conditions;
        Ok(self)
    }

    pub fn order(&mut self, order_spec: &str) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse::<T>(order_spec)?;
        Ok(self)
    }

    /// Apply a page window. A non-positive limit means "as many as allowed";
    /// anything above the configured maximum page size is capped to it.
    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if let Some(off) = offset {
            if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); }
        }

        let max_limit = crate::config::CONFIG.api.max_page_size.max(1);
        let applied_limit = if limit <= 0 {
            max_limit
        } else if limit > max_limit {
            tracing::debug!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;
        let order_clause = FilterOrder::generate::<T>(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", T::TABLE),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", T::TABLE)
        } else {
            format!("SELECT COUNT(*) as count FROM \"{}\" WHERE {}", T::TABLE, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    /// `INSERT … RETURNING key` for the given column values.
    pub fn to_insert_sql(&self, values: &[(&'static str, FilterValue)]) -> Result<SqlResult, FilterError> {
        if values.is_empty() { return Err(FilterError::EmptyAssignment); }
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        for (index, (column, _)) in values.iter().enumerate() {
            validate_identifier(column)?;
            columns.push(format!("\"{}\"", column));
            placeholders.push(format!("${}", index + 1));
        }
        let query = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING \"{}\"",
            T::TABLE,
            columns.join(", "),
            placeholders.join(", "),
            T::KEY
        );
        let params = values.iter().map(|(_, v)| v.clone()).collect();
        Ok(SqlResult { query, params })
    }

    /// `UPDATE … SET` restricted by the current WHERE conditions.
    pub fn to_update_sql(&self, assignments: &[(&'static str, FilterValue)]) -> Result<SqlResult, FilterError> {
        if assignments.is_empty() { return Err(FilterError::EmptyAssignment); }
        let mut sets = Vec::with_capacity(assignments.len());
        let mut params = Vec::with_capacity(assignments.len());
        for (index, (column, value)) in assignments.iter().enumerate() {
            validate_identifier(column)?;
            sets.push(format!("\"{}\" = ${}", column, index + 1));
            params.push(value.clone());
        }

        let (where_clause, where_params) = FilterWhere::generate(&self.where_data, params.len())?;
        params.extend(where_params);

        let mut query = format!("UPDATE \"{}\" SET {}", T::TABLE, sets.join(", "));
        if !where_clause.is_empty() {
            query.push_str(&format!(" WHERE {}", where_clause));
        }
        Ok(SqlResult { query, params })
    }

    pub fn to_delete_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;
        let query = if where_clause.is_empty() {
            format!("DELETE FROM \"{}\"", T::TABLE)
        } else {
            format!("DELETE FROM \"{}\" WHERE {}", T::TABLE, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    pub fn matches(&self, record: &T) -> bool {
        FilterWhere::matches(&self.where_data, record)
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        FilterOrder::compare(&self.order_data, a, b)
    }

    /// Apply ordering and the page window to rows that already passed [`Filter::matches`].
    pub fn paginate<'a>(&self, mut rows: Vec<&'a T>) -> Vec<&'a T> {
        rows.sort_by(|a, b| self.compare(a, b));
        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let limit = self.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).collect()
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        validate_identifier(name).map_err(|_| FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}
