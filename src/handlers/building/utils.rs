use axum::http::{header, HeaderMap};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::database::models::BuildingFields;
use crate::error::ApiError;

/// A form value that could not be converted to its field type
#[derive(Debug, thiserror::Error)]
#[error("{field}: invalid {expected} '{value}'")]
pub struct BindError {
    pub field: &'static str,
    pub expected: &'static str,
    pub value: String,
}

impl From<BindError> for ApiError {
    fn from(err: BindError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Raw form fields as posted by the building editor.
///
/// Every field is kept as text so that empty inputs can be told apart from
/// malformed ones; conversion happens in [`BuildingForm::bind`].
#[derive(Debug, Default, Deserialize)]
pub struct BuildingForm {
    #[serde(rename = "Id", alias = "id")]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Floors")]
    pub floors: Option<String>,
    #[serde(rename = "Height")]
    pub height: Option<String>,
    #[serde(rename = "Area")]
    pub area: Option<String>,
    #[serde(rename = "BuildDate")]
    pub build_date: Option<String>,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
}

/// Bound form: identifier (when posted) plus the supplied attributes
#[derive(Debug, Default, PartialEq)]
pub struct BoundBuilding {
    pub id: Option<i64>,
    pub fields: BuildingFields,
}

impl BuildingForm {
    /// Convert form text into typed fields. Empty values count as "not
    /// supplied"; non-empty values that fail to parse are bind errors.
    pub fn bind(self) -> Result<BoundBuilding, BindError> {
        Ok(BoundBuilding {
            id: parse_strict("Id", self.id)?,
            fields: BuildingFields {
                name: non_empty(self.name),
                floors: parse_strict("Floors", self.floors)?,
                height: parse_strict("Height", self.height)?,
                area: parse_strict("Area", self.area)?,
                build_date: match non_empty(self.build_date) {
                    Some(raw) => Some(parse_date(&raw).ok_or_else(|| BindError {
                        field: "BuildDate",
                        expected: "date",
                        value: raw,
                    })?),
                    None => None,
                },
                remark: non_empty(self.remark),
            },
        })
    }
}

/// Identifier parameter for delete requests (query string or form body)
#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    #[serde(rename = "Id", alias = "id")]
    pub id: Option<String>,
}

/// Resolve a required positive identifier
pub fn require_id(id: Option<i64>) -> Result<i64, ApiError> {
    match id {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(ApiError::bad_request(format!("Id must be a positive integer, got {}", id))),
        None => Err(ApiError::bad_request("Id is required")),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn parse_strict<T: std::str::FromStr>(field: &'static str, value: Option<String>) -> Result<Option<T>, BindError> {
    match non_empty(value) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| BindError {
            field,
            expected: "integer",
            value: raw,
        }),
        None => Ok(None),
    }
}

/// Lenient numeric query parameter: empty or malformed values are ignored.
pub fn parse_lenient<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, naive ISO timestamps and RFC 3339; keeps the date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// True for script-driven requests that expect JSON rather than a page.
pub fn is_programmatic(headers: &HeaderMap) -> bool {
    let ajax = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false);
    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json") && !v.contains("text/html"))
        .unwrap_or(false);
    ajax || wants_json
}
