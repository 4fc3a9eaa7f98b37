use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Mutation outcome envelope: `{success, message}`
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub status_code: Option<StatusCode>,
}

impl ApiResponse {
    /// Create a successful response with default 200 status
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: None,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Listing envelope: `{total, rows}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub total: i64,
    pub rows: Vec<T>,
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// Convenience type aliases
pub type ApiResult<T = ApiResponse> = Result<T, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_without_status() {
        let body = serde_json::to_value(ApiResponse::success("Success")).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "message": "Success"}));
    }

    #[test]
    fn list_envelope_keeps_empty_rows() {
        let body = serde_json::to_value(ListResponse::<u8> { total: 0, rows: vec![] }).unwrap();
        assert_eq!(body, serde_json::json!({"total": 0, "rows": []}));
    }
}
