//! Web server for the filmtrack interface

use filmtrack_core::{Config, context_error, context_error::Result, init_logging};
use filmtrack_web::build_app;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let config = Config::load();
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging)?;

    let config = config.unwrap_or_else(|err| {
        warn!("Failed to load config ({}), using defaults", err);
        Config::default()
    });

    let host: IpAddr = config
        .web
        .host
        .parse()
        .map_err(|e| context_error!("Invalid web server host '{}': {}", config.web.host, e))?;
    let addr = SocketAddr::new(host, config.web.port);

    let app = build_app(config.clone())
        .map_err(|e| context_error!("Failed to build web app: {}", e))?
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| context_error!("Failed to bind to {}: {}", addr, e))?;

    info!(
        "Starting filmtrack web server on http://{} (API at {})",
        addr, config.web.api_base_url
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| context_error!("Server error: {}", e))?;

    info!("Web server stopped");
    Ok(())
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
