use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    MalformedBody,
    MissingRequiredFields,
    InvalidId,
    NotFound,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn malformed_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::MalformedBody,
            "Invalid JSON",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn missing_required_fields(fields: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::MissingRequiredFields,
            "Missing required fields",
            json!({"fields": fields}),
        )
    }

    #[must_use]
    pub fn invalid_id(value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidId,
            "Invalid experiment id",
            json!({"id": value}),
        )
    }

    #[must_use]
    pub fn not_found(id: i64) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            "Experiment not found",
            json!({"id": id}),
        )
    }

    #[must_use]
    pub fn store_unavailable() -> Self {
        Self::new(
            ApiErrorCode::StoreUnavailable,
            "Database not available",
            json!({}),
        )
    }

    #[must_use]
    pub fn internal(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::Internal,
            "Internal error",
            json!({"reason": reason}),
        )
    }
}

/// HTTP status for an error code. Not-found is distinct from validation.
#[must_use]
pub fn map_error_status(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::MalformedBody
        | ApiErrorCode::MissingRequiredFields
        | ApiErrorCode::InvalidId => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::StoreUnavailable | ApiErrorCode::Internal => 500,
    }
}
