use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::{ALLOWED_EXTENSIONS, StorageError};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `UNSUPPORTED_FILE_TYPE`, `FILE_TOO_LARGE`, `NOT_FOUND`, `CONFLICT`,
    /// `STORAGE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "File is required")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    UnsupportedFileType(String),
    FileTooLarge(String),
    NotFound(String),
    Conflict(String),
    /// Filesystem or database I/O failure. Detail is logged, not returned.
    Storage(String),
    Internal(String),
}

impl AppError {
    /// Build the error for an extension outside the allowed set.
    pub fn unsupported_extension(extension: &str) -> Self {
        AppError::UnsupportedFileType(format!(
            "Unsupported file type '{extension}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    }

    /// Build the error for an upload over the configured size limit.
    pub fn file_too_large(limit: u64) -> Self {
        AppError::FileTooLarge(format!(
            "File exceeds the maximum size of {} MiB",
            limit / (1024 * 1024)
        ))
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::UnsupportedFileType(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "UNSUPPORTED_FILE_TYPE",
                    message: msg,
                },
            ),
            AppError::FileTooLarge(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "FILE_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::Storage(detail) => {
                tracing::error!("Storage error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: "A storage error occurred".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EmptyContent => AppError::Validation("File is required".into()),
            StorageError::UnsupportedExtension(ext) => AppError::unsupported_extension(&ext),
            StorageError::SizeLimitExceeded { limit, .. } => AppError::file_too_large(limit),
            StorageError::NotFound(name) => AppError::NotFound(format!("File '{name}' not found")),
            // Stored names come from our own records; a malformed one is a bug.
            StorageError::InvalidName(name) => {
                AppError::Internal(format!("Malformed stored filename: {name}"))
            }
            StorageError::Io(e) => AppError::Storage(e.to_string()),
        }
    }
}
