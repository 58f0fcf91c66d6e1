//! # Centralized Error Handling
//!
//! A unified error type for the HTTP layer. Store failures are logged here
//! once and turned into a generic 500; everything else maps to its status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::services::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("store error")]
    Store(#[from] StoreError),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Store(e) = &self {
            error!(error = ?e, "Catalog store error occurred");
        }

        let (status, message) = match self {
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;
