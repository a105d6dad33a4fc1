use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::error::ConfigError;

/// Application-wide error type that represents all possible errors in the system.
///
/// Handlers and behaviours never catch these; they propagate unchanged up to the
/// HTTP surface, which is the only place they are mapped to status codes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested data does not exist
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// One or more field constraints were not met
    #[error("Validation failed: {} field error(s)", .errors.len())]
    Validation { errors: Vec<ValidationFieldError> },

    /// Malformed request that could not be turned into a typed request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Store operation did not complete
    #[error("Persistence failure: {operation}")]
    PersistenceFailure { operation: String },

    /// The caller's cancellation token fired before the operation finished
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    /// NotFound for a user id; shared by get, update and delete.
    pub fn user_not_found(id: i32) -> Self {
        Self::not_found(user_not_found_message(id))
    }

    pub fn persistence(operation: impl Into<String>) -> Self {
        AppError::PersistenceFailure {
            operation: operation.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration {
            key: "settings".to_string(),
            source: anyhow::Error::new(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation {
            errors: field_errors(&errors),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

pub fn user_not_found_message(id: i32) -> String {
    format!("The user '{id}' could not be found")
}

/// Flattens `validator` output into wire-named field errors, ordered by field.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<ValidationFieldError> {
    let mut flattened: Vec<ValidationFieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = to_camel_case(field);
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                ValidationFieldError::new(field.clone(), message)
            })
        })
        .collect();
    flattened.sort_by(|a, b| a.field.cmp(&b.field));
    flattened
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Given names must not be empty"))]
        given_names: String,
        #[validate(range(min = 1))]
        page_number: i32,
    }

    #[test]
    fn test_user_not_found_message() {
        let err = AppError::user_not_found(42);
        assert!(err.is_not_found());
        match err {
            AppError::NotFound { message } => {
                assert_eq!(message, "The user '42' could not be found")
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors_use_wire_names() {
        let sample = Sample {
            given_names: String::new(),
            page_number: 0,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        match err {
            AppError::Validation { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "givenNames");
                assert_eq!(errors[0].message, "Given names must not be empty");
                assert_eq!(errors[1].field, "pageNumber");
                // No custom message falls back to the validator code
                assert_eq!(errors[1].message, "range");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case("items_per_page"), "itemsPerPage");
        assert_eq!(to_camel_case("lastName"), "lastName");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AppError = ConfigError::validation("server.port", "bad port").into();
        assert!(matches!(err, AppError::Configuration { .. }));
    }
}
