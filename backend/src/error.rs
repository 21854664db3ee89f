//! Error types for the matrixops service.
//!
//! Errors are layered the same way the request flows:
//!
//! - [`MatrixError`] - failures of a matrix derivation (non-numeric cell, overflow, ragged rows)
//! - [`CsvError`] - failures turning uploaded bytes into a validated matrix
//! - [`ClientError`] - a caller-fixable failure with a status and a disclosed detail
//! - [`ApiError`] - what a handler returns: either a [`ClientError`] or an opaque server fault
//!
//! Only [`ApiError`] ever reaches the HTTP boundary. Its rendering lives in
//! [`crate::api::types`].

use std::fmt;
use std::num::ParseIntError;

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

/// Boxed error used for causes and opaque faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Matrix Errors
// =============================================================================

/// Errors raised by [`crate::matrix::Matrix`] derivations.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// A cell could not be read as a base-10 signed 64-bit integer.
    #[error("Non number value found: '{value}'")]
    NonNumericCell {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The running sum or product left the `i64` range.
    #[error("Arithmetic overflow")]
    Overflow,

    /// A row is shorter than the first row, so it cannot be transposed.
    #[error("Row {row} has {found} items, expected at least {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// CSV Ingestion Errors
// =============================================================================

/// Errors while turning CSV bytes into a [`crate::matrix::Matrix`].
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV: unequal record lengths or invalid UTF-8.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// A field mixes quoted and unquoted text, or a quote is never closed.
    #[error("Malformed quoting on line {line}: {field}")]
    MalformedQuoting { line: u64, field: String },

    /// The file holds no records.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A cell failed the integer validation gate.
    #[error("Item '{value}' is not an integer")]
    NotAnInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

// =============================================================================
// Client Errors
// =============================================================================

/// A failure the caller can fix.
///
/// `detail` is safe to disclose and ends up in the response body. `cause` is kept for logs only
/// and is never serialized.
#[derive(Debug)]
pub struct ClientError {
    cause: Option<BoxError>,
    detail: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl ClientError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            cause: None,
            detail: detail.into(),
            status,
            headers: HeaderMap::new(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attach an extra response header, written before the status and body.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl Default for ClientError {
    fn default() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, String::new())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} : {}", self.detail, cause),
            None => write!(f, "{}", self.detail),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// API Errors (top-level)
// =============================================================================

/// Error returned by every operation handler.
///
/// `Client` is rendered with its detail and status. `Opaque` is rendered as a bare 500 and its
/// content never leaves the server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Internal error: {0}")]
    Opaque(BoxError),
}

impl ApiError {
    pub fn opaque(err: impl Into<BoxError>) -> Self {
        Self::Opaque(err.into())
    }

    /// The disclosed detail of a client error. Opaque errors have none.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Client(err) => Some(err.detail()),
            Self::Opaque(_) => None,
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for matrix derivations.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Result type for CSV ingestion.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for operation handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = "Unknown error detail";

    fn parse_failure() -> ParseIntError {
        "x".parse::<i64>().unwrap_err()
    }

    #[test]
    fn test_client_error_display_with_cause() {
        let err = ClientError::new(StatusCode::INTERNAL_SERVER_ERROR, DETAIL)
            .with_cause("Unknown error cause");
        assert_eq!(err.to_string(), "Unknown error detail : Unknown error cause");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_client_error_display_without_cause() {
        let err = ClientError::bad_request(DETAIL);
        assert_eq!(err.to_string(), DETAIL);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_client_error_default_status() {
        let err = ClientError::default();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.headers().is_empty());
    }

    #[test]
    fn test_client_error_headers() {
        let err = ClientError::bad_request(DETAIL)
            .with_header(HeaderName::from_static("x-reason"), HeaderValue::from_static("csv"));
        assert_eq!(err.headers().get("x-reason").unwrap(), "csv");
    }

    #[test]
    fn test_api_error_conversion() {
        let api: ApiError = ClientError::bad_request(DETAIL).into();
        assert!(api.is_client());
        assert_eq!(api.to_string(), DETAIL);

        let opaque = ApiError::opaque("disk on fire");
        assert!(!opaque.is_client());
        assert_eq!(opaque.detail(), None);
    }

    #[test]
    fn test_api_error_detail_excludes_cause() {
        let api: ApiError = ClientError::bad_request("Item 'c' is not an integer.")
            .with_cause(parse_failure())
            .into();
        assert_eq!(api.detail(), Some("Item 'c' is not an integer."));
    }

    #[test]
    fn test_matrix_error_format() {
        let err = MatrixError::NonNumericCell {
            value: "c".into(),
            source: parse_failure(),
        };
        assert!(err.to_string().contains("'c'"));

        let err = MatrixError::RaggedRow { row: 2, expected: 3, found: 1 };
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_csv_error_format() {
        let err = CsvError::NotAnInteger {
            value: "abc".into(),
            source: parse_failure(),
        };
        assert_eq!(err.to_string(), "Item 'abc' is not an integer");
        assert_eq!(CsvError::EmptyFile.to_string(), "CSV file is empty");
    }
}
