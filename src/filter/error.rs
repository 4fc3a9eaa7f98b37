use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("No columns to write")]
    EmptyAssignment,
}
