//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `400 invalid_request` with
//! `details.field` naming the offending camelCase request field.

use serde_json::json;

use crate::domain::review::ReviewValidationError;
use crate::domain::{Error, PizzaValidationError, Price, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn user_validation_error(error: UserValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn pizza_validation_error(error: PizzaValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn review_validation_error(error: ReviewValidationError) -> Error {
    let field = match error {
        ReviewValidationError::RatingOutOfRange(_) => "rating",
        ReviewValidationError::CommentTooLong { .. } => "comment",
    };
    ValidationError::new(field, error.to_string()).with_code(ErrorCode::InvalidValue)
}

/// Parse an optional decimal price from a query string value.
pub(crate) fn parse_optional_price(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Price>, Error> {
    value
        .map(|raw| {
            raw.parse::<Price>().map_err(|err| {
                ValidationError::new(field.as_str(), err.to_string())
                    .with_code(ErrorCode::InvalidValue)
            })
        })
        .transpose()
}

/// Require a non-blank string parameter.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}
