use std::sync::Arc;

use axum::extract::{rejection::FormRejection, Form, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BuildingService;

use super::utils::BuildingForm;

/// POST /buildings - create a building from form fields
///
/// Any posted `Id` is ignored; identifiers are assigned by the store.
pub async fn add(
    State(service): State<Arc<BuildingService>>,
    form: Result<Form<BuildingForm>, FormRejection>,
) -> ApiResult {
    let Form(form) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let bound = form.bind()?;

    let id = service.create(bound.fields).await?;
    tracing::info!(id, "Building created");
    Ok(ApiResponse::success("Success"))
}
