//! API error type with IntoResponse.
//!
//! Every failure leaves the handler as a status code plus
//! `{"error", "message", "violations"?}`. Storage internals are logged and
//! replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::{Access, AppError, IdParseError, StorageError, Violations};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// Outcome of a service call.
    App(AppError),

    /// Request body is not valid JSON (400).
    MalformedBody(String),

    /// Path segment of a read is not a valid identifier (400).
    InvalidPath(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a Violations>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::App(err) => match err {
                AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AppError::NotFound { .. } => StatusCode::NOT_FOUND,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                AppError::StorageFailure {
                    access: Access::Read,
                    ..
                } => StatusCode::BAD_REQUEST,
                AppError::StorageFailure {
                    access: Access::Write,
                    ..
                } => StatusCode::UNPROCESSABLE_ENTITY,
                AppError::TransactionAborted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "malformed_body",
            Self::InvalidPath(_) => "invalid_path",
            Self::App(err) => match err {
                AppError::ValidationFailed(_) => "validation_failed",
                AppError::NotFound { .. } => "not_found",
                AppError::Conflict(_) => "conflict",
                AppError::StorageFailure { source, .. } | AppError::TransactionAborted { source }
                    if source.is_unavailable() =>
                {
                    "storage_unavailable"
                }
                AppError::StorageFailure {
                    access: Access::Read,
                    ..
                } => "read_failed",
                AppError::StorageFailure {
                    access: Access::Write,
                    ..
                } => "write_failed",
                AppError::TransactionAborted { .. } => "transaction_aborted",
            },
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::MalformedBody(detail) => format!("request body is not valid JSON: {detail}"),
            Self::InvalidPath(detail) => detail.clone(),
            Self::App(AppError::StorageFailure { source, access }) => {
                log_storage(*access, source);
                if source.is_unavailable() {
                    "storage is temporarily unavailable".to_owned()
                } else {
                    format!("could not {access} data")
                }
            }
            Self::App(AppError::TransactionAborted { source }) => {
                log_storage(Access::Write, source);
                if source.is_unavailable() {
                    "storage is temporarily unavailable".to_owned()
                } else {
                    "the operation was rolled back; nothing was saved".to_owned()
                }
            }
            Self::App(other) => other.to_string(),
        }
    }
}

fn log_storage(access: Access, source: &StorageError) {
    if source.is_unavailable() {
        tracing::error!(%access, error = %source, "storage unavailable");
    } else {
        tracing::warn!(%access, error = %source, "storage failure");
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let violations = match &self {
            Self::App(AppError::ValidationFailed(v)) => Some(v),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code(),
            message: self.public_message(),
            violations,
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<IdParseError> for ApiError {
    fn from(err: IdParseError) -> Self {
        Self::InvalidPath(err.to_string())
    }
}
