//! Response types and error rendering.
//!
//! This is the only place where an [`ApiError`] becomes an HTTP response:
//!
//! - [`ApiError::Client`] → the error's headers and status, body `{"detail":"..."}`
//! - [`ApiError::Opaque`] → bare 500, empty body
//!
//! If the client error body cannot be serialized the response also falls back to a bare 500.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ClientError};

/// JSON body of a client error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            service: "matrixops".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ClientError {
    /// Serialized `{"detail":"..."}` body. The cause is never included.
    pub fn response_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&ErrorBody {
            detail: self.detail().to_string(),
        })
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let body = match self.response_body() {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize client error body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        tracing::debug!(status = %self.status(), error = %self, "Client error");

        let mut response = body.into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in self.headers() {
            response.headers_mut().insert(name.clone(), value.clone());
        }
        *response.status_mut() = self.status();
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Client(err) => err.into_response(),
            ApiError::Opaque(err) => {
                tracing::error!(error = %err, "Server error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::HeaderName;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_response_body_excludes_cause() {
        let err = ClientError::bad_request("Unknown error detail").with_cause("secret path /etc");
        let body = err.response_body().unwrap();
        assert_eq!(body, br#"{"detail":"Unknown error detail"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_client_error_response() {
        let err = ClientError::bad_request("Bad request : matrix not provided.")
            .with_header(HeaderName::from_static("x-matrix"), HeaderValue::from_static("none"));
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-matrix"], "none");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_string(response).await,
            r#"{"detail":"Bad request : matrix not provided."}"#
        );
    }

    #[tokio::test]
    async fn test_client_error_custom_status() {
        let err = ClientError::new(StatusCode::UNPROCESSABLE_ENTITY, "nope");
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_opaque_error_is_not_disclosed() {
        let response = ApiError::opaque("database password is hunter2").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.is_empty());
    }

    #[test]
    fn test_health_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "ok");
        assert_eq!(health.service, "matrixops");
    }
}
