// Error types shared across the crate

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UnsupportedFile(_) | AppError::Parse(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in the `error` field of JSON error bodies.
    fn label(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Invalid input",
            AppError::UnsupportedFile(_) => "Unsupported file type",
            AppError::Parse(_) => "Failed to parse dataset",
            AppError::Backend(_) | AppError::Http(_) => "Backend request failed",
            AppError::Io(_) => "I/O failure",
            AppError::Json(_) => "Malformed JSON",
            AppError::Unauthenticated => "Not signed in",
            AppError::Internal(_) => "Internal error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (
            status,
            Json(serde_json::json!({
                "error": self.label(),
                "details": self.to_string(),
            })),
        )
            .into_response()
    }
}
