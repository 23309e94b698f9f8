//! Centralized error types for Skyferry.
//!
//! Uses `thiserror` for ergonomic error definitions and provides HTTP-friendly
//! error variants that can be directly converted to API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Core application error type used across all Skyferry services.
#[derive(Debug, thiserror::Error)]
pub enum FerryError {
    // === Auth errors ===
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized")]
    Unauthorized,

    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    // === Validation errors ===
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Cannot move flight from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    // === Access errors ===
    #[error("Missing permission: {permission}")]
    MissingPermission { permission: String },

    #[error("You must belong to an organization")]
    NoOrganization,

    #[error("Access denied")]
    Forbidden,

    // === Infrastructure errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl FerryError {
    /// Shorthand for the common `NotFound` case.
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::MissingPermission { .. } | Self::NoOrganization | Self::Forbidden => {
                StatusCode::FORBIDDEN
            }
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::MissingPermission { .. } => "MISSING_PERMISSION",
            Self::NoOrganization => "NO_ORGANIZATION",
            Self::Forbidden => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for FerryError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure failures get a generic message; the backend's own
        // message travels in `details`.
        let (message, details) = match &self {
            FerryError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("An internal error occurred".to_string(), Some(e.to_string()))
            }
            FerryError::Storage(e) => {
                tracing::error!("Storage error: {e:#}");
                ("Document storage failed".to_string(), Some(format!("{e:#}")))
            }
            FerryError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                ("An internal error occurred".to_string(), Some(format!("{e:#}")))
            }
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message,
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using FerryError.
pub type FerryResult<T> = Result<T, FerryError>;
