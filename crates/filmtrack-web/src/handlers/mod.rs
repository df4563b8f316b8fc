//! Request handlers for the web interface

pub mod actions;
pub mod pages;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
