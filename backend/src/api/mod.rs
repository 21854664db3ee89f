//! HTTP API module.
//!
//! This module provides the HTTP server, the upload extractor, the operation handlers and the
//! error rendering for the matrixops service.

pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod server;
pub mod types;

pub use handlers::Operation;
pub use ingest::MatrixUpload;
pub use server::{router, start_server};
pub use types::*;
