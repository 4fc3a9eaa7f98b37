use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::format::buildings_to_html;
use crate::database::models::{BuildingFilter, BuildingQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResult, ListResponse};
use crate::services::BuildingService;

use super::utils::{is_programmatic, parse_lenient};

/// Listing parameters as sent by data-grid widgets. Kept as text so that
/// empty or malformed values are ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub rows: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub name: Option<String>,
    pub floors: Option<String>,
    pub height: Option<String>,
    pub area: Option<String>,
}

impl ListQuery {
    /// Sort expression: `Id` when no order is given, `-field` for descending.
    pub fn sort_expression(&self) -> String {
        match self.order.as_deref().filter(|o| !o.is_empty()) {
            Some(order) => {
                let field = self.sort.clone().unwrap_or_default();
                if order.eq_ignore_ascii_case("desc") {
                    format!("-{}", field)
                } else {
                    field
                }
            }
            None => "Id".to_string(),
        }
    }

    pub fn to_building_query(&self) -> BuildingQuery {
        let page = parse_lenient(&self.page).unwrap_or(1);
        let page_size = parse_lenient(&self.rows).unwrap_or(crate::config::config().api.default_page_size);
        let filter = BuildingFilter {
            name: self.name.clone().filter(|n| !n.is_empty()),
            floors: parse_lenient(&self.floors),
            height: parse_lenient(&self.height),
            area: parse_lenient(&self.area),
        };
        BuildingQuery::new(page, page_size, self.sort_expression(), filter)
    }
}

/// GET /buildings - filtered, sorted, paginated listing
pub async fn list(
    State(service): State<Arc<BuildingService>>,
    headers: HeaderMap,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = params.to_building_query();
    let page = service.list(&query).await?;

    if is_programmatic(&headers) {
        Ok(ListResponse { total: page.total, rows: page.rows }.into_response())
    } else {
        Ok(Html(buildings_to_html(&page, &query.pagination)).into_response())
    }
}
