//! HTTP API Module
//!
//! Provides the HTTP server with the schema, NL2SQL, execution, analytics,
//! document and workflow endpoints. Every JSON response uses the
//! `{ success, data?, error? }` envelope.

pub mod dto;
pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::HttpConfig;
use crate::protocol::Handler;

use self::handlers::{admin, analytics, documents, execute, nl2sql, schema, workflow};

/// Creates the Axum router
pub fn create_router(handler: Arc<Handler>, config: &HttpConfig) -> Router {
    // Build CORS layer
    let cors = if !config.cors_origins.is_empty() {
        // Explicit origins configured: restrict to those
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| {
                let parsed = s.parse();
                if parsed.is_err() {
                    tracing::warn!(origin = %s, "invalid CORS origin ignored");
                }
                parsed.ok()
            })
            .collect();
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if config.cors_allow_all {
        // Explicit dev mode opt-in: allow all origins
        Some(CorsLayer::permissive())
    } else {
        // Default: same-origin only (no CORS layer = Axum denies cross-origin)
        None
    };

    let mut app = Router::new()
        .route("/health", get(admin::health))
        .route("/stats", get(admin::stats))
        .route("/api/reload-check", get(admin::reload_check))
        .route("/api/query-schema", post(schema::query_schema))
        .route("/api/nl2sql", post(nl2sql::nl2sql))
        .route("/api/execute-sql", post(execute::execute_sql))
        .route("/api/analytics", get(analytics::analytics))
        .route("/api/upload-schema", post(documents::upload_schema))
        .route("/api/documents", get(documents::list_documents))
        .route("/api/documents/:id", delete(documents::delete_document))
        .route(
            "/api/clear-vector-store",
            post(documents::clear_vector_store),
        )
        .route("/api/workflow", post(workflow::workflow))
        .fallback(handlers::not_found)
        .layer(Extension(handler))
        // Multipart honours DefaultBodyLimit, so lift it and cap with tower-http instead
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes));

    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    app
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Listens for SIGINT (ctrl-c) and SIGTERM to trigger graceful shutdown.
pub async fn start_http_server(
    handler: Arc<Handler>,
    config: &HttpConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(handler, config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(%addr, "http_server_listening");

    let socket = tokio::net::TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(1024)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("http_server_stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for ctrl-c");
                if ctrl_c.await.is_ok() {
                    tracing::info!("received SIGINT, shutting down");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if ctrl_c.await.is_ok() {
            tracing::info!("received SIGINT, shutting down");
        }
    }
}
