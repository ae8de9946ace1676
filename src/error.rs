//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the library returns [`AppError`]. Handlers
//! return it directly; axum renders it through [`IntoResponse`] as a JSON
//! envelope:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short URL not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Body of the `error` field in the JSON error envelope.
#[derive(Debug, Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Submitted URL is not absolute (missing scheme or host).
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// Unknown short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Request body failed structural validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The backing store could not be written or read.
    #[error("storage failure: {source}")]
    StorageIo {
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn storage(source: std::io::Error) -> Self {
        Self::StorageIo { source }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for conditions the user can correct (bad input, unknown code).
    ///
    /// These are surfaced as messages and never logged as system faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::NotFound { .. } | Self::Validation { .. }
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StorageIo { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its client-facing payload.
    ///
    /// Storage failures are reported generically; the underlying I/O error
    /// stays in the logs.
    fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::InvalidUrl { message, details } => ErrorInfo {
                code: "invalid_url",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::StorageIo { .. } => ErrorInfo {
                code: "storage_error",
                message: "Storage is temporarily unavailable".to_string(),
                details: json!({}),
            },
            Self::Internal { message, details } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_user_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}
