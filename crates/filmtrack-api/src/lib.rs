//! Film collection REST service
//!
//! Serves `GET/POST /films` and `GET/PUT/DELETE /films/{id}` over an ordered
//! in-memory store, plus `/health`.

#![forbid(unsafe_code)]

pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use state::AppState;
pub use store::FilmStore;

use axum::Router;
use filmtrack_core::{Config, Result};
use std::sync::Arc;

/// Build the API router, seeding the store from configuration
///
/// # Errors
///
/// Returns an error if the configured seed file cannot be loaded.
pub fn build_router(config: Config) -> Result<Router> {
    let state = AppState::new(config)?;
    Ok(build_router_with_state(state))
}

/// Build the API router around prepared state
pub fn build_router_with_state(state: AppState) -> Router {
    routes::build_router().with_state(Arc::new(state))
}
