//! API route definitions

use crate::{handlers, state::AppState};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

/// Film collection routes
pub fn film_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/films",
            get(handlers::films::list_films).post(handlers::films::create_film),
        )
        .route(
            "/films/:id",
            get(handlers::films::get_film)
                .put(handlers::films::update_film)
                .delete(handlers::films::delete_film),
        )
        .layer(CompressionLayer::new())
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(film_routes())
        .merge(health_routes())
        .fallback(not_found_handler)
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (axum::http::StatusCode, axum::Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "error": "Not Found",
            "code": "ROUTE_NOT_FOUND",
            "message": "The requested endpoint does not exist"
        })),
    )
}
