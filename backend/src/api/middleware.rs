//! Request middleware.

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Let only POST requests through. Anything else gets a 405 with an empty body.
pub async fn post_only(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Method not allowed"
        );
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    next.run(request).await
}
