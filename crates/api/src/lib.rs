//! Shared API views, payload parsing and SQL builders for stockroom.
//!
//! The `views` module turns loaded records into response JSON, `input` turns
//! request JSON into typed changes, and `query` holds list filters and detail
//! toggles. With the `backend` feature, `db` provides the sea-query builders
//! the store executes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod db;
pub mod input;
pub mod query;
pub mod views;

pub use stockroom_core::currency::CurrencyChoice;
pub use stockroom_core::ValidationError;

// ─── Health / metadata ───────────────────────────────────────────────────────

/// Returned by `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Returned by `GET /api/currencies`.
#[derive(Debug, Serialize)]
pub struct CurrencyListResponse {
    pub default: String,
    pub currencies: Vec<CurrencyChoice>,
}

// ─── Field errors ────────────────────────────────────────────────────────────

/// Validation failures keyed by input field, serialized as
/// `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn push(&mut self, err: ValidationError) {
        self.add(err.field().to_string(), err.to_string());
    }

    /// Record the error half of `result`, passing the value through.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(err);
        errors
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for m in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {m}")?;
            }
        }
        Ok(())
    }
}

// ─── Service Error ───────────────────────────────────────────────────────────

/// Framework-agnostic service error.
///
/// Each variant maps to an HTTP status code. `Validation` carries the
/// per-field messages returned as the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    BadRequest(String),
    Validation(FieldErrors),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error message.
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Conflict(m) | Self::Internal(m) => {
                m.clone()
            }
            Self::Validation(errors) => errors.to_string(),
        }
    }

    /// Build a closure that wraps a DB/IO error as `Internal`.
    pub fn from_db<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> Self + '_ {
        move |e| Self::Internal(format!("{context}: {e}"))
    }

    /// A single-field validation failure.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// JSON error shape `{ "error": "..." }` for non-validation failures.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl From<&ServiceError> for ApiError {
    fn from(e: &ServiceError) -> Self {
        Self { error: e.message() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_shape() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::MissingField {
            field: "name".into(),
        });
        errors.add("name", "second");
        errors.push(ValidationError::InvalidChoice {
            field: "currency".into(),
            value: "XYZ".into(),
        });
        let v = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "currency": ["\"XYZ\" is not a valid choice."],
                "name": ["This field is required.", "second"],
            })
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::field("x", "bad").status_code(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), 409);
        let err = ServiceError::from_db::<&str>("load company")("disk I/O error");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "load company: disk I/O error");
    }

    #[test]
    fn test_empty_errors_pass() {
        assert!(FieldErrors::new().into_result().is_ok());
        let mut errors = FieldErrors::new();
        assert_eq!(errors.check::<i32>(Ok(1)), Some(1));
        assert!(errors.is_empty());
    }
}
