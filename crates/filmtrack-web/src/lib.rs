//! filmtrack web interface
//!
//! Server-rendered pages for browsing, editing, and summarizing a film
//! collection held by the filmtrack API.

#![forbid(unsafe_code)]

pub mod api_client;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

// Re-export the main functions
pub use api_client::{ApiClient, FilmApi};
pub use server::{build_app, build_app_with_state};
pub use state::AppState;
pub use views::{FilmListView, FilmStatsView};
