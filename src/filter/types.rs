use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    /// Exact match
    #[serde(rename = "$eq")]
    Eq,
    /// Literal substring match (`LIKE '%…%'` with wildcards escaped)
    #[serde(rename = "$contains")]
    Contains,
}

/// A typed SQL parameter / column value.
///
/// Variant order matters for in-memory sorting: comparisons only ever happen
/// between values of the same column, so the derived ordering reduces to the
/// payload ordering.
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum FilterValue {
    Null,
    Int(i32),
    BigInt(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::BigInt(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(v: NaiveDate) -> Self {
        FilterValue::Date(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Timestamp(v)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// A table-mapped record the filter can address by column.
///
/// The same trait drives SQL generation and in-memory evaluation, so both
/// storage backends agree on which rows match and in which order.
pub trait FilterRecord {
    /// Table the record is persisted in
    const TABLE: &'static str;
    /// Primary key column, also used as the final sort tie-break
    const KEY: &'static str;

    /// Resolve a caller-facing field name (wire or column name) to a column
    fn column(field: &str) -> Option<&'static str>;

    /// Current value of a column, `None` for unknown columns
    fn value(&self, column: &str) -> Option<FilterValue>;
}

#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub where_clause: Vec<FilterWhereInfo>,
    /// Sort expression, e.g. `"-Name"` or `"Floors desc, Id"`
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: &'static str,
    pub operator: FilterOp,
    pub data: FilterValue,
}

impl FilterWhereInfo {
    pub fn eq(column: &'static str, data: impl Into<FilterValue>) -> Self {
        Self { column, operator: FilterOp::Eq, data: data.into() }
    }

    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self { column, operator: FilterOp::Contains, data: FilterValue::Text(needle.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        // NULL placement mirrors Option ordering (None sorts before Some)
        match self {
            SortDirection::Asc => "ASC NULLS FIRST",
            SortDirection::Desc => "DESC NULLS LAST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
