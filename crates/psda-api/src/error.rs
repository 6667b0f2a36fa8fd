//! API error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use psda_core::GridError;
use psda_db::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    MixedUnits(String),

    /// Source data names a resource the registry does not declare.
    #[error("{0}")]
    UnknownResource(String),

    #[error("A seeding run is already in progress")]
    SeedInProgress,

    /// Details are logged where the error is created; the client sees a fixed message.
    #[error("Internal server error")]
    Internal,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MixedUnits(_) | ApiError::UnknownResource(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::SeedInProgress => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::MixedUnits(_) => "MIXED_UNITS",
            ApiError::UnknownResource(_) => "UNKNOWN_RESOURCE",
            ApiError::SeedInProgress => "SEED_IN_PROGRESS",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeedInProgress => ApiError::SeedInProgress,
            StoreError::Grid(grid) => ApiError::from(grid),
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::NotFound(_) => ApiError::NotFound(err.to_string()),
            GridError::MixedUnits { .. } => ApiError::MixedUnits(err.to_string()),
            GridError::UnknownResource { .. } => ApiError::UnknownResource(err.to_string()),
            GridError::Parse(_) | GridError::Validation(_) => ApiError::BadRequest(err.to_string()),
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
