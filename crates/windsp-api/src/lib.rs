//! HTTP API exposing the WinDSP configuration document
//!
//! Routes are declared in `routes::ROUTES`:
//! - `GET /json`, `GET /rest/json`: current file content
//! - `PUT /json`, `PUT /rest/json`: replace the file content
//! - `GET /health`: liveness

pub mod endpoint;
pub mod error;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use windsp_config::Settings;

pub use endpoint::{ConfigDocument, ConfigEndpoint};
pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub endpoint: ConfigEndpoint,
}

/// Create the application router from the route table.
///
/// Saves replace the whole document, so request bodies are not size limited.
pub fn create_router(state: AppState) -> Router {
    routes::ROUTES
        .iter()
        .fold(Router::new(), |router, entry| {
            router.route(entry.path, entry.method_router())
        })
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl-C
pub async fn start_server(settings: &Settings, endpoint: ConfigEndpoint) -> std::io::Result<()> {
    let addr = settings.bind_addr();
    let state = AppState { endpoint };

    let mut router = create_router(state);
    if settings.server.cors {
        router = router.layer(CorsLayer::permissive());
    }

    let listener = TcpListener::bind(&addr).await?;
    info!("Starting WinDSP config server on http://{}", addr);
    info!("Available routes:");
    for entry in routes::ROUTES {
        info!("  - {} {} ({:?})", entry.verb, entry.path, entry.operation);
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
