//! Unified error handling
//!
//! Every handler failure collapses into the wire shape
//! `{ "success": false, "message": "..." }` with the matching status
//! code; nothing propagates past the HTTP boundary undetected.
//!
//! | Variant | Status | Meaning |
//! |---------|--------|---------|
//! | Validation | 400 | malformed/missing body or field |
//! | NotFound | 404 | unknown printer id / discovery miss |
//! | Transport | 500 | adapter construction or printer I/O failure |
//! | Internal | 500 | anything unexpected |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_printer::PrintError;
use serde::Serialize;
use tracing::error;

/// Uniform API response body
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Transport(msg) => {
                error!(target: "printer", error = %msg, "Transport error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

impl From<PrintError> for AppError {
    fn from(e: PrintError) -> Self {
        match e {
            PrintError::InvalidConfig(_) => AppError::Validation(e.to_string()),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(e: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(format!("Request body must be JSON: {}", e))
    }
}

/// Handler result type
pub type ApiResult<T> = Result<T, AppError>;
