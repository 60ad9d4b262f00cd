//! Application error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A provider credential was not configured
    #[error("API key is required. Please set {0} environment variable")]
    MissingApiKey(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    /// Transport failure or non-2xx status from an upstream API
    #[error("{0}")]
    Upstream(String),

    /// Upstream answered, but not with the expected shape
    #[error("{0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Upstream(_)
            | AppError::InvalidResponse(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Collapse any error into a 500 carrying `prefix` and the original message
    pub fn into_internal(self, prefix: &str) -> AppError {
        AppError::Internal(format!("{}{}", prefix, self))
    }
}

/// Error body returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(status = %status, detail = %detail, "Request failed");
        } else {
            warn!(status = %status, detail = %detail, "Request rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
