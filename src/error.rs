// SPDX-License-Identifier: MIT

//! Application error taxonomy shared by the server and client layers.
//!
//! The server converts errors into `{ message, code }` JSON responses; the
//! client maps those responses (and transport failures) back into the same
//! enum, so retry decisions and UI messaging work from one type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application error type that converts to HTTP responses.
///
/// Every variant is cheap to clone so the query cache can store the last
/// error alongside a slot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Field name -> message, for form-level display.
        fields: BTreeMap<String, String>,
    },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected error: {message}")]
    Unknown {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// Validation error with a single message and no field breakdown.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn activity_not_found(id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: "activity",
            id: id.into(),
        }
    }

    /// True for 4xx-class errors, which are terminal until the caller
    /// changes parameters and must never be retried automatically.
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Validation { .. }
            | ApiError::Unauthorized
            | ApiError::Forbidden
            | ApiError::NotFound { .. } => true,
            ApiError::Unknown { status, .. } => {
                matches!(status, Some(s) if (400..500).contains(s))
            }
            ApiError::Network(_) => false,
        }
    }

    /// Wire code for the JSON error body (e.g. `ACTIVITY_NOT_FOUND`).
    pub fn code(&self) -> String {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR".to_string(),
            ApiError::Unauthorized => "UNAUTHORIZED".to_string(),
            ApiError::Forbidden => "FORBIDDEN".to_string(),
            ApiError::NotFound { resource, .. } => {
                format!("{}_NOT_FOUND", resource.to_uppercase())
            }
            ApiError::Network(_) => "NETWORK_ERROR".to_string(),
            ApiError::Unknown { .. } => "INTERNAL_ERROR".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Network(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unknown { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ErrorBody {
    /// Rebuild an `ApiError` from a decoded error body and its HTTP status.
    /// Used by the client when a response carries a structured error.
    pub fn into_error(self, status: u16) -> ApiError {
        match self.code.as_str() {
            "VALIDATION_ERROR" => ApiError::Validation {
                message: self.message,
                fields: self.fields,
            },
            "UNAUTHORIZED" => ApiError::Unauthorized,
            "FORBIDDEN" => ApiError::Forbidden,
            code if code.ends_with("_NOT_FOUND") => ApiError::NotFound {
                resource: "activity",
                id: self.message,
            },
            _ => ApiError::Unknown {
                status: Some(status),
                message: self.message,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let fields = match &self {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        };

        let body = ErrorBody {
            message: self.to_string(),
            code: self.code(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.insert(field.to_string(), message);
            }
        }
        let message = fields
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::Validation { message, fields }
    }
}

/// Result type alias for handlers and client calls.
pub type Result<T> = std::result::Result<T, ApiError>;
