use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOrderInfo, FilterRecord, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a sort expression into resolved columns.
    ///
    /// Accepts comma-separated terms, each either `-field` (descending),
    /// `field`, or `field asc|desc`. Field names are resolved through
    /// [`FilterRecord::column`], so unknown fields are rejected here.
    pub fn validate_and_parse<T: FilterRecord>(order: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }

            let mut it = trimmed.split_whitespace();
            let Some(token) = it.next() else { continue };
            let (field, mut sort) = match token.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (token, SortDirection::Asc),
            };
            if let Some(dir) = it.next() {
                if dir.eq_ignore_ascii_case("desc") {
                    sort = SortDirection::Desc;
                }
            }
            // A bare "-" (descending marker with no field) sorts by the key
            if field.is_empty() {
                out.push(FilterOrderInfo { column: T::KEY, sort });
                continue;
            }

            let column = T::column(field).ok_or_else(|| FilterError::UnknownSortField(field.to_string()))?;
            out.push(FilterOrderInfo { column, sort });
        }
        Ok(out)
    }

    /// `ORDER BY` clause with the key column appended as a stable tie-break.
    pub fn generate<T: FilterRecord>(infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        if !infos.iter().any(|i| i.column == T::KEY) {
            parts.push(format!("\"{}\" {}", T::KEY, SortDirection::Asc.to_sql()));
        }
        format!("ORDER BY {}", parts.join(", "))
    }

    /// In-memory counterpart of [`FilterOrder::generate`].
    pub fn compare<T: FilterRecord>(infos: &[FilterOrderInfo], a: &T, b: &T) -> Ordering {
        let tie_break = FilterOrderInfo { column: T::KEY, sort: SortDirection::Asc };
        for info in infos.iter().chain(std::iter::once(&tie_break)) {
            let ordering = a
                .value(info.column)
                .partial_cmp(&b.value(info.column))
                .unwrap_or(Ordering::Equal);
            let ordering = match info.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
