use std::sync::Arc;

use axum::extract::{rejection::FormRejection, Form, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BuildingService;

use super::utils::{require_id, BuildingForm};

/// POST /buildings/update - apply the posted fields to building `Id`
pub async fn update(
    State(service): State<Arc<BuildingService>>,
    form: Result<Form<BuildingForm>, FormRejection>,
) -> ApiResult {
    let Form(form) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let bound = form.bind()?;
    let id = require_id(bound.id)?;

    let affected = service.update(id, bound.fields).await?;
    if affected == 0 {
        return Err(ApiError::not_found(format!("Building {} not found", id)));
    }
    tracing::info!(id, "Building updated");
    Ok(ApiResponse::success("Success"))
}
