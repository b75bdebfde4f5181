//! Error types for basket-server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use basket_core::MiningError;

/// Result type alias for server startup
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors raised while configuring or starting the server
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transaction log could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] MiningError),
}

/// Errors returned to HTTP clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// Season selector missing or outside 1..=4
    #[error("Invalid season")]
    InvalidSeason,

    /// Analysis did not finish within the configured budget
    #[error("Computation exceeded {0} ms budget")]
    BudgetExceeded(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSeason => StatusCode::BAD_REQUEST,
            ApiError::BudgetExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
