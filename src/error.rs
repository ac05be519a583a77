//! Typed errors and HTTP mapping. Every error renders as `{"message": "..."}`.

use crate::document::{BodyError, InvalidBookId};
use crate::response::MessageBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const BOOK_NOT_FOUND: &str = "Book not found";

/// Error returned by a handler. The variant fixes the status code; which variant a
/// store failure becomes is decided per route.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn book_not_found() -> Self {
        AppError::NotFound(BOOK_NOT_FOUND.into())
    }

    pub fn bad_request(e: impl std::fmt::Display) -> Self {
        AppError::BadRequest(e.to_string())
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidBookId> for AppError {
    fn from(e: InvalidBookId) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<BodyError> for AppError {
    fn from(e: BodyError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(AppError::book_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        let e: AppError = InvalidBookId("zz".into()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "invalid book id 'zz'");
    }
}
