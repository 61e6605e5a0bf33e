//! # API Errors
//!
//! Infrastructure failures that surface as 5xx. Validation failures and
//! zero-row mutations are not errors; they are answered with 400 "Failed".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::DbError;
use log::error;
use thiserror::Error;

use crate::routes::MessageResponse;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage or pool failure
    #[error("{0}")]
    Db(#[from] DbError),

    /// The blocking worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Db(DbError::PoolExhausted(_)) | ApiError::Db(DbError::PoolClosed) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Db(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(
            "event=http_error module=server status={} error={}",
            status.as_u16(),
            self
        );
        let body = Json(MessageResponse::new(self.to_string()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(DbError::PoolExhausted(Duration::from_secs(1))).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DbError::PoolClosed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DbError::Constraint("FOREIGN KEY constraint failed".into()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
