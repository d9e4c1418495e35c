use crate::config::ConfigError;
use crate::models::query::ValidationError;
use crate::storage::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Book ID is required")]
    MissingId,
    #[error("Invalid Book ID format")]
    InvalidId,
    #[error("Book not found")]
    NotFound,
    #[error("Error fetching books: {0}")]
    Backend(#[from] StorageError),
    #[error("Error decoding book: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Error encoding JSON: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Failures that stop the service from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to connect to storage backend: {0}")]
    Storage(#[from] StorageError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingId | ApiError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(_) | ApiError::Decode(_) | ApiError::Encoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}
