use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::services::BuildingService;

/// GET / - service name, version and endpoint index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "PMS API (Rust)",
            "version": version,
            "description": "Storied building registry with filtered, paginated listings",
            "endpoints": {
                "list": "GET /buildings?page=&rows=&sort=&order=&name=&floors=&height=&area=",
                "add": "POST /buildings (form)",
                "update": "POST /buildings/update (form, Id required)",
                "delete": "POST /buildings/delete?Id=",
                "health": "GET /health",
            }
        }
    }))
}

/// GET /health - store reachability
pub async fn health(State(service): State<Arc<BuildingService>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match service.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
