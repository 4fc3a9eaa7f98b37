use std::sync::Arc;

use axum::extract::{rejection::QueryRejection, Form, Query, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BuildingService;

use super::utils::{parse_strict, require_id, IdParams};

/// POST /buildings/delete?Id= - delete one building
///
/// The identifier may also be posted as a form field.
pub async fn delete(
    State(service): State<Arc<BuildingService>>,
    query: Result<Query<IdParams>, QueryRejection>,
    form: Option<Form<IdParams>>,
) -> ApiResult {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let raw = query.id.or_else(|| form.and_then(|Form(f)| f.id));
    let id = require_id(parse_strict("Id", raw)?)?;

    let affected = service.delete(id).await?;
    if affected == 0 {
        return Err(ApiError::not_found(format!("Building {} not found", id)));
    }
    tracing::info!(id, "Building deleted");
    Ok(ApiResponse::success("Success"))
}
