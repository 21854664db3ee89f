//! HTTP server for the matrixops API.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                              |
//! |--------|-------------|------------------------------------------|
//! | GET    | `/health`   | Health check                             |
//! | POST   | `/echo`     | Uploaded matrix as CSV text              |
//! | POST   | `/invert`   | Transposed matrix as CSV text            |
//! | POST   | `/flatten`  | All cells on one comma-separated line    |
//! | POST   | `/sum`      | Sum of all cells                         |
//! | POST   | `/multiply` | Product of all cells                     |
//!
//! Operation routes take a multipart upload with a `file` field. Any other method on them is
//! answered with 405.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::Operation;
use super::ingest::MatrixUpload;
use super::middleware::post_only;
use super::types::HealthResponse;
use crate::config::ServerConfig;
use crate::error::ApiResult;

/// Build the application router.
pub fn router(config: &ServerConfig) -> Router {
    let mut operations = Router::new();
    for operation in Operation::ALL {
        operations = operations.route(
            operation.path(),
            any(move |upload: MatrixUpload| run_operation(operation, upload)),
        );
    }

    operations
        .route_layer(middleware::from_fn(post_only))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr();
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        max_upload_bytes = config.max_upload_bytes,
        "matrixops server running"
    );
    for operation in Operation::ALL {
        tracing::info!("   POST {}", operation.path());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("matrixops server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn run_operation(operation: Operation, upload: MatrixUpload) -> ApiResult<String> {
    tracing::info!(
        %operation,
        rows = upload.matrix().map(|m| m.row_count()),
        "Running operation"
    );
    operation.apply(upload.matrix())
}
