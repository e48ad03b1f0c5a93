//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::state::AppState;
use crate::errors::InventoryError;
use crate::server::handlers::{
    create_handler, delete_device_handler, delete_group_handler, health_handler, list_handler,
    refresh_handler, show_handler, update_handler, version_handler,
};
use crate::storage::settings::ServerSettings;

/// Run the HTTP server until the shutdown signal fires
pub async fn serve(
    settings: &ServerSettings,
    state: Arc<AppState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), InventoryError> {
    let app = Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Groups
        .route("/groups", get(list_handler))
        .route(
            "/groups/{id}",
            get(show_handler)
                .patch(update_handler)
                .delete(delete_group_handler),
        )
        // Devices
        .route("/devices", post(create_handler))
        .route("/groups/{id}/devices/{hostname}", delete(delete_device_handler))
        .route(
            "/groups/{id}/devices/{hostname}/refresh",
            post(refresh_handler),
        )
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.host, settings.port);
    info!("Starting inventory API on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| InventoryError::Internal(e.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| InventoryError::Internal(e.to_string()))
}
