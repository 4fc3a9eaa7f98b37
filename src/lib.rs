pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::services::BuildingService;

/// Build the HTTP application around a building service.
pub fn app(service: Arc<BuildingService>) -> Router {
    let config = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .merge(building_routes())
        .with_state(service);

    // Global middleware
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn building_routes() -> Router<Arc<BuildingService>> {
    use handlers::building;

    Router::new()
        .route("/buildings", get(building::list).post(building::add))
        .route("/buildings/update", post(building::update))
        .route("/buildings/delete", post(building::delete))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if crate::is_development!() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}
