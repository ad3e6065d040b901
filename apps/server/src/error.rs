//! Crate-wide error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No handler is registered under the requested operation name.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Failure reported by a document store backend other than Postgres.
    #[error("Store failure: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A multi-step cascade stopped partway. Surveys listed in `completed`
    /// are fully gone; `failed` and everything after it are untouched.
    #[error("Cascade aborted at survey '{failed}' after {} completed: {reason}", completed.len())]
    CascadeAborted {
        completed: Vec<String>,
        failed: String,
        reason: String,
    },

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownOperation(_) => StatusCode::NOT_FOUND,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Notification(e.to_string())
    }
}
