use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use stockroom_api::{ApiError, ServiceError};

/// Error returned by every handler.
///
/// Validation failures produce the field-keyed body
/// `{"field": ["message", ...]}`; everything else produces
/// `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiErr {
    status: StatusCode,
    body: Value,
}

impl ApiErr {
    fn message(status: StatusCode, msg: impl Into<String>) -> Self {
        let body = serde_json::to_value(ApiError { error: msg.into() }).unwrap_or(Value::Null);
        Self { status, body }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl From<ServiceError> for ApiErr {
    fn from(e: ServiceError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match e {
            ServiceError::Validation(errors) => Self {
                status,
                body: serde_json::to_value(&errors).unwrap_or(Value::Null),
            },
            ServiceError::Internal(detail) => {
                tracing::error!("{detail}");
                Self::internal("internal server error")
            }
            other => Self::message(status, other.message()),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_api::FieldErrors;

    #[test]
    fn test_validation_body_is_field_keyed() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        let err = ApiErr::from(ServiceError::Validation(errors));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            &serde_json::json!({"name": ["This field is required."]})
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiErr::from(ServiceError::Internal("insert company: disk I/O".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body(),
            &serde_json::json!({"error": "internal server error"})
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiErr::from(ServiceError::NotFound("company not found".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body()["error"], "company not found");
    }
}
