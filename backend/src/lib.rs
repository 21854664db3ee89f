//! # matrixops - matrix operations on uploaded CSV files
//!
//! An HTTP service that takes a CSV file of integers and echoes, transposes, flattens, sums or
//! multiplies it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Request   │────▶│ Method gate │────▶│  Ingestion  │────▶│  Operation  │────▶│  Response   │
//! │ (multipart) │     │ (POST only) │     │ (CSV→Matrix)│     │  (handler)  │     │ (text/JSON) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Every failure is an [`ApiError`]: a [`ClientError`] is rendered as `{"detail": "..."}` with its
//! status, anything else becomes a bare 500.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matrixops::{parse_matrix, Operation};
//!
//! let matrix = parse_matrix(b"1,2,3\n4,5,6\n7,8,9").unwrap();
//! assert_eq!(Operation::Sum.apply(Some(&matrix)).unwrap(), "45");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`matrix`] - The matrix and its derivations
//! - [`parser`] - CSV parsing and integer validation
//! - [`config`] - Server configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod matrix;

// Parsing
pub mod parser;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ApiError,
    ApiResult,
    BoxError,
    ClientError,
    CsvError,
    CsvResult,
    MatrixError,
    MatrixResult,
};

// =============================================================================
// Re-exports - Matrix
// =============================================================================

pub use matrix::Matrix;

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    parse_matrix,
    parse_matrix_file,
    parse_records,
    validate_integers,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::ServerConfig;

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{
    ErrorBody,
    HealthResponse,
    MatrixUpload,
    Operation,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
