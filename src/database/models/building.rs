use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::{FilterData, FilterRecord, FilterValue, FilterWhereInfo, Pagination};

use super::validation::{ValidationErrors, Validator};

pub const NAME_MAX_CHARS: usize = 20;
pub const REMARK_MAX_CHARS: usize = 200;

/// A storied building row as persisted in `storied_building`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Building {
    pub id: i64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub name: String,
    pub floors: i32,
    pub height: i32,
    pub area: i32,
    pub build_date: NaiveDate,
    pub remark: Option<String>,
}

impl FilterRecord for Building {
    const TABLE: &'static str = "storied_building";
    const KEY: &'static str = "id";

    fn column(field: &str) -> Option<&'static str> {
        let normalized: String = field
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "id" => Some("id"),
            "created" => Some("created"),
            "modified" => Some("modified"),
            "name" => Some("name"),
            "floors" => Some("floors"),
            "height" => Some("height"),
            "area" => Some("area"),
            "builddate" => Some("build_date"),
            "remark" => Some("remark"),
            _ => None,
        }
    }

    fn value(&self, column: &str) -> Option<FilterValue> {
        Some(match column {
            "id" => self.id.into(),
            "created" => self.created.into(),
            "modified" => self.modified.into(),
            "name" => self.name.clone().into(),
            "floors" => self.floors.into(),
            "height" => self.height.into(),
            "area" => self.area.into(),
            "build_date" => self.build_date.into(),
            "remark" => self.remark.clone().into(),
            _ => return None,
        })
    }
}

/// Caller-supplied building attributes. Every field is optional: `None` means
/// "not supplied", which is distinct from a supplied zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingFields {
    pub name: Option<String>,
    pub floors: Option<i32>,
    pub height: Option<i32>,
    pub area: Option<i32>,
    pub build_date: Option<NaiveDate>,
    pub remark: Option<String>,
}

/// A fully validated building ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBuilding {
    pub name: String,
    pub floors: i32,
    pub height: i32,
    pub area: i32,
    pub build_date: NaiveDate,
    pub remark: Option<String>,
}

impl BuildingFields {
    /// Creation rules: every attribute except the remark is required, and
    /// every supplied value must satisfy its value rules.
    pub fn validate_new(self) -> Result<NewBuilding, ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .required("Name", &self.name)
            .size("Name", &self.name, 1, NAME_MAX_CHARS)
            .required("Floors", &self.floors)
            .positive("Floors", &self.floors)
            .required("Height", &self.height)
            .positive("Height", &self.height)
            .required("Area", &self.area)
            .positive("Area", &self.area)
            .required("BuildDate", &self.build_date)
            .size("Remark", &self.remark, 0, REMARK_MAX_CHARS);
        validator.finish()?;

        match (self.name, self.floors, self.height, self.area, self.build_date) {
            (Some(name), Some(floors), Some(height), Some(area), Some(build_date)) => Ok(NewBuilding {
                name,
                floors,
                height,
                area,
                build_date,
                remark: self.remark,
            }),
            // Required checks above reject every missing field
            _ => Err(ValidationErrors(vec![])),
        }
    }

    /// Update rules: the same value rules as creation, applied to supplied fields only.
    pub fn validate_changes(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .size("Name", &self.name, 1, NAME_MAX_CHARS)
            .positive("Floors", &self.floors)
            .positive("Height", &self.height)
            .positive("Area", &self.area)
            .size("Remark", &self.remark, 0, REMARK_MAX_CHARS)
            .finish()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column assignments for the supplied fields only.
    pub fn assignments(&self) -> Vec<(&'static str, FilterValue)> {
        let mut out = Vec::new();
        if let Some(floors) = self.floors { out.push(("floors", floors.into())); }
        if let Some(height) = self.height { out.push(("height", height.into())); }
        if let Some(area) = self.area { out.push(("area", area.into())); }
        if let Some(name) = &self.name { out.push(("name", name.clone().into())); }
        if let Some(remark) = &self.remark { out.push(("remark", remark.clone().into())); }
        if let Some(build_date) = self.build_date { out.push(("build_date", build_date.into())); }
        out
    }

    /// Apply the supplied fields to an existing row.
    pub fn apply_to(&self, building: &mut Building) {
        if let Some(floors) = self.floors { building.floors = floors; }
        if let Some(height) = self.height { building.height = height; }
        if let Some(area) = self.area { building.area = area; }
        if let Some(name) = &self.name { building.name = name.clone(); }
        if let Some(remark) = &self.remark { building.remark = Some(remark.clone()); }
        if let Some(build_date) = self.build_date { building.build_date = build_date; }
    }
}

impl NewBuilding {
    pub fn assignments(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("floors", self.floors.into()),
            ("height", self.height.into()),
            ("area", self.area.into()),
            ("build_date", self.build_date.into()),
            ("remark", self.remark.clone().into()),
        ]
    }
}

/// Listing criteria. Only non-empty / positive fields narrow the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingFilter {
    pub name: Option<String>,
    pub floors: Option<i32>,
    pub height: Option<i32>,
    pub area: Option<i32>,
}

impl BuildingFilter {
    pub fn conditions(&self) -> Vec<FilterWhereInfo> {
        let mut out = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            out.push(FilterWhereInfo::contains("name", name));
        }
        if let Some(floors) = self.floors.filter(|v| *v > 0) {
            out.push(FilterWhereInfo::eq("floors", floors));
        }
        if let Some(height) = self.height.filter(|v| *v > 0) {
            out.push(FilterWhereInfo::eq("height", height));
        }
        if let Some(area) = self.area.filter(|v| *v > 0) {
            out.push(FilterWhereInfo::eq("area", area));
        }
        out
    }
}

/// One List call: page window, sort expression and filter.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingQuery {
    pub pagination: Pagination,
    /// Field name, optionally prefixed with `-` for descending order
    pub sort: String,
    pub filter: BuildingFilter,
}

impl BuildingQuery {
    pub fn new(page: i64, page_size: i64, sort: impl Into<String>, filter: BuildingFilter) -> Self {
        Self {
            pagination: Pagination::capped(page, page_size, crate::config::config().api.max_page_size),
            sort: sort.into(),
            filter,
        }
    }

    pub fn to_filter_data(&self) -> FilterData {
        FilterData {
            where_clause: self.filter.conditions(),
            order: Some(self.sort.clone()),
            limit: Some(self.pagination.limit()),
            offset: Some(self.pagination.offset()),
        }
    }
}

/// One page of rows plus the total number of matches across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct BuildingPage {
    pub total: i64,
    pub rows: Vec<Building>,
}
