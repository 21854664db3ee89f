//! Upload ingestion.
//!
//! [`MatrixUpload`] is an extractor: it reads the multipart field named `file`, parses it as CSV
//! and validates every cell before the handler runs. The handler receives the matrix as an
//! argument.
//!
//! | Situation                          | Result                                   |
//! |------------------------------------|------------------------------------------|
//! | request is not `multipart/form-data` | no matrix (handler reports it)         |
//! | no `file` field / unreadable body  | 400 `file not found.`                    |
//! | body over the upload limit         | 413 `file too large.`                    |
//! | malformed or empty CSV             | 400 `incorrect file data.`               |
//! | cell that is not an integer        | 400 `Item '<value>' is not an integer.`  |

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header, HeaderMap, StatusCode},
};

use crate::error::{ApiError, ApiResult, ClientError, CsvError};
use crate::matrix::Matrix;
use crate::parser::parse_matrix;

pub const FILE_FIELD: &str = "file";
pub const FILE_NOT_FOUND: &str = "file not found.";
pub const FILE_TOO_LARGE: &str = "file too large.";
pub const INCORRECT_FILE_DATA: &str = "incorrect file data.";

/// Matrix extracted from the request, `None` when no upload was sent.
#[derive(Debug, Clone, Default)]
pub struct MatrixUpload(pub Option<Matrix>);

impl MatrixUpload {
    pub fn matrix(&self) -> Option<&Matrix> {
        self.0.as_ref()
    }
}

impl<S> FromRequest<S> for MatrixUpload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(req.headers()) {
            return Ok(Self(None));
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ClientError::bad_request(FILE_NOT_FOUND).with_cause(e))?;

        let bytes = read_file_field(multipart).await?;
        let matrix = ingest_bytes(&bytes)?;

        tracing::debug!(
            rows = matrix.row_count(),
            columns = matrix.column_count(),
            bytes = bytes.len(),
            "Matrix ingested"
        );

        Ok(Self(Some(matrix)))
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn multipart_error(err: MultipartError) -> ApiError {
    let client = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ClientError::new(StatusCode::PAYLOAD_TOO_LARGE, FILE_TOO_LARGE)
    } else {
        ClientError::bad_request(FILE_NOT_FOUND)
    };
    client.with_cause(err).into()
}

async fn read_file_field(mut multipart: Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            return field.bytes().await.map_err(multipart_error);
        }
    }

    Err(ClientError::bad_request(FILE_NOT_FOUND).into())
}

/// Parse uploaded bytes into a validated [`Matrix`], mapping failures to client errors.
pub fn ingest_bytes(bytes: &[u8]) -> Result<Matrix, ClientError> {
    parse_matrix(bytes).map_err(|err| {
        let detail = match &err {
            CsvError::NotAnInteger { value, .. } => format!("Item '{}' is not an integer.", value),
            _ => INCORRECT_FILE_DATA.to_string(),
        };
        ClientError::bad_request(detail).with_cause(err)
    })
}
