// ABOUTME: Unified error handling with error codes, HTTP status mapping, and JSON responses
// ABOUTME: Defines AppError, ErrorCode, field-level ValidationErrors and the AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Unified Error Handling System
//!
//! Every fallible operation in the server returns [`AppResult`]. Errors carry a
//! stable [`ErrorCode`] that decides the HTTP status, a human-readable message,
//! and optional structured details. Validation failures put their per-field
//! messages into the details object so clients can highlight the offending
//! inputs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No credentials were supplied
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials were supplied but are not valid
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Token lifetime has elapsed
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    /// Caller is authenticated but may not perform the action
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Required field absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Malformed data (bad JSON, bad data URI)
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// Numeric value outside its allowed range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Unique constraint would be violated
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,

    // Configuration (6000-6999)
    /// Configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Storage failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Media storage failure
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Serialization failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange => 400,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,

            // 403 Forbidden
            Self::PermissionDenied => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists => 409,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the message is safe to show to API clients
    ///
    /// Server-side failures are logged in full but only the generic
    /// description reaches the response body.
    #[must_use]
    pub const fn is_client_facing(self) -> bool {
        self.http_status() < 500
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details (field errors, limits)
    pub details: serde_json::Value,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authenticated caller lacks permission
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Resource already exists (unique constraint)
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Media storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error body
    pub error: ErrorResponseDetails,
}

/// Error body inside [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable error code
    pub code: ErrorCode,
    /// Message for the client
    pub message: String,
    /// Field errors or other structured context
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let message = if error.code.is_client_facing() {
            error.message
        } else {
            error.code.description().to_owned()
        };
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message,
                details: error.details,
            },
        }
    }
}

/// Field-level validation error collector
///
/// Messages are grouped by field name in insertion order per field. An empty
/// collector means the payload passed validation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Whether no errors were recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the given field has at least one error
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages recorded for a field
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Convert into `Err(AppError)` when any error was recorded
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_INPUT` error carrying every field message when the
    /// collector is not empty.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors.fields).unwrap_or(serde_json::Value::Null);
        Self::new(ErrorCode::InvalidInput, "Validation failed").with_details(details)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::not_found("Row"),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::already_exists(db.message().to_owned())
            }
            _ => Self::database(error.to_string()),
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::extract::rejection::JsonRejection;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;

    use super::{AppError, ErrorCode, ErrorResponse, ValidationErrors};

    const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";
    const BODY_FIELD: &str = "non_field_errors";

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            match rejection {
                JsonRejection::JsonDataError(error) => {
                    let text = error.body_text();
                    let detail = text.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(&text);
                    let (field, message) = split_serde_path(detail);
                    let mut errors = ValidationErrors::new();
                    errors.add(field, message);
                    errors.into()
                }
                JsonRejection::MissingJsonContentType(_) => {
                    let mut errors = ValidationErrors::new();
                    errors.add(BODY_FIELD, "Expected Content-Type: application/json");
                    errors.into()
                }
                other => Self::new(ErrorCode::InvalidInput, "Malformed request body")
                    .with_details(serde_json::json!({ BODY_FIELD: [other.body_text()] })),
            }
        }
    }

    /// Split a `serde_path_to_error` message into its top-level field and text
    ///
    /// `ingredients[0].amount: invalid type` keys on `ingredients` and keeps
    /// the full path in the message. A root-level `missing field `name``
    /// keys on the missing field itself.
    fn split_serde_path(detail: &str) -> (String, String) {
        if let Some((path, message)) = detail.split_once(": ") {
            if !path.contains(' ') {
                let top = path
                    .split(['.', '['])
                    .next()
                    .filter(|top| !top.is_empty())
                    .unwrap_or(BODY_FIELD);
                let message = missing_field(message).map_or_else(
                    || format!("{path}: {message}"),
                    |missing| format!("{path}.{missing}: This field is required"),
                );
                return (top.to_owned(), message);
            }
        }

        missing_field(detail).map_or_else(
            || (BODY_FIELD.to_owned(), detail.to_owned()),
            |missing| (missing.to_owned(), "This field is required".to_owned()),
        )
    }

    fn missing_field(message: &str) -> Option<&str> {
        let rest = message.strip_prefix("missing field `")?;
        rest.split('`').next()
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if status.is_server_error() {
                tracing::error!(code = ?self.code, message = %self.message, "Request failed");
            } else {
                tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
            }

            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_nested_type_error_keys_on_top_field() {
            let (field, message) =
                split_serde_path("ingredients[0].amount: invalid type: string \"abc\", expected i64");
            assert_eq!(field, "ingredients");
            assert!(message.starts_with("ingredients[0].amount: invalid type"));
        }

        #[test]
        fn test_nested_missing_field() {
            let (field, message) = split_serde_path("ingredients[0]: missing field `amount`");
            assert_eq!(field, "ingredients");
            assert_eq!(message, "ingredients[0].amount: This field is required");
        }

        #[test]
        fn test_root_missing_field() {
            let (field, message) = split_serde_path("missing field `password` at line 1 column 2");
            assert_eq!(field, "password");
            assert_eq!(message, "This field is required");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ResourceAlreadyExists.http_status(), 409);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_validation_errors_group_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("ingredients", "Ingredients must be unique");
        errors.add("ingredients", "Amount must be at least 1");
        errors.add("tags", "This field is required");

        assert!(errors.has_field("ingredients"));
        assert_eq!(errors.messages("ingredients").len(), 2);
        assert!(errors.messages("name").is_empty());

        let error: AppError = errors.into();
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert_eq!(error.details["tags"][0], "This field is required");
    }

    #[test]
    fn test_empty_validation_errors_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_server_errors_hide_message() {
        let response = ErrorResponse::from(AppError::database("disk I/O error at page 7"));
        assert_eq!(response.error.message, "Database operation failed");

        let response = ErrorResponse::from(AppError::not_found("Recipe 7"));
        assert_eq!(response.error.message, "Recipe 7 not found");
    }

    #[test]
    fn test_error_response_serialization() {
        let mut errors = ValidationErrors::new();
        errors.add("cooking_time", "Ensure this value is greater than or equal to 1");
        let response = ErrorResponse::from(AppError::from(errors));

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("INVALID_INPUT"));
        assert!(json.contains("cooking_time"));
    }
}
