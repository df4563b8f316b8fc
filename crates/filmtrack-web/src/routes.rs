//! Route definitions for the web interface

use crate::{
    handlers::{self, actions, pages},
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Page routes
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::film_list_page))
        .route("/stats", get(pages::stats_page))
}

/// Form actions of the film list
pub fn action_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/films/save", post(actions::save_film))
        .route("/films/cancel", post(actions::cancel_edit))
        .route("/films/:id/edit", post(actions::start_edit))
        .route("/films/:id/delete", post(actions::remove_film))
}

/// Build the complete web application router
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(page_routes())
        .merge(action_routes())
        .route("/health", get(handlers::health_check))
        .fallback(pages::not_found)
}
