use super::error::FilterError;
use super::types::{FilterOp, FilterRecord, FilterValue, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions as an `AND`-joined predicate (empty string when there are none).
    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    pub fn validate(conditions: &[FilterWhereInfo]) -> Result<(), FilterError> {
        for condition in conditions {
            validate_identifier(condition.column)?;
            if condition.operator == FilterOp::Contains && !matches!(condition.data, FilterValue::Text(_)) {
                return Err(FilterError::InvalidColumn(format!(
                    "substring match on \"{}\" requires a text value",
                    condition.column
                )));
            }
        }
        Ok(())
    }

    /// Evaluate conditions against an in-memory record with the same semantics as the SQL.
    pub fn matches<T: FilterRecord>(conditions: &[FilterWhereInfo], record: &T) -> bool {
        conditions.iter().all(|condition| {
            let Some(value) = record.value(condition.column) else { return false };
            match (condition.operator, &condition.data) {
                // SQL `= NULL` never matches
                (FilterOp::Eq, FilterValue::Null) => false,
                (FilterOp::Eq, expected) => &value == expected,
                (FilterOp::Contains, FilterValue::Text(needle)) => match value {
                    FilterValue::Text(haystack) => haystack.contains(needle.as_str()),
                    _ => false,
                },
                (FilterOp::Contains, _) => false,
            }
        })
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<(String, Vec<FilterValue>), FilterError> {
        Self::validate(conditions)?;

        let mut sql_conditions = vec![];
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition));
        }
        Ok((sql_conditions.join(" AND "), self.param_values.clone()))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let quoted_column = format!("\"{}\"", condition.column);
        match (condition.operator, &condition.data) {
            (FilterOp::Eq, FilterValue::Null) => "1=0".to_string(),
            (FilterOp::Eq, data) => format!("{} = {}", quoted_column, self.param(data.clone())),
            (FilterOp::Contains, FilterValue::Text(needle)) => {
                let pattern = format!("%{}%", escape_like(needle));
                format!("{} LIKE {}", quoted_column, self.param(FilterValue::Text(pattern)))
            }
            // Rejected by validate()
            (FilterOp::Contains, _) => "1=0".to_string(),
        }
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape `LIKE` metacharacters so the needle matches literally (Postgres default escape is `\`).
pub fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
    }
    Ok(())
}
