//! Application error type.
//!
//! Every failure that crosses the HTTP boundary is an [`AppError`]: an HTTP
//! status plus an [`anyhow::Error`] carrying the message. The status encodes
//! the error class:
//!
//! | Class | Status |
//! |-------|--------|
//! | invalid argument | 400 (422 for DTO validation) |
//! | unauthenticated | 401 |
//! | forbidden | 403 |
//! | not found | 404 |
//! | conflict | 409 |
//! | gone | 410 |
//! | too many requests | 429 |
//! | internal | 500 |
//!
//! Server errors are logged in full and rendered with an opaque message so
//! query text and driver details never reach the client.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message returned to clients for any 5xx error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, Error::msg(message.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::message(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::message(StatusCode::CONFLICT, message)
    }

    /// The resource existed but is no longer usable (e.g. an expired token).
    pub fn gone(message: impl Into<String>) -> Self {
        Self::message(StatusCode::GONE, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::message(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        };

        (self.status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_constructors_map_to_status() {
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("bad")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("x")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::conflict("x").status, StatusCode::CONFLICT);
        assert_eq!(AppError::gone("x").status, StatusCode::GONE);
        assert_eq!(
            AppError::internal_error("x").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_foreign_error_is_internal() {
        let io = std::io::Error::other("disk on fire");
        let err: AppError = io.into();
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let (status, body) = body_json(AppError::gone("This token has expired.")).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["error"], "This token has expired.");
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let (status, body) =
            body_json(AppError::internal_error("relation \"stu_links\" does not exist")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
