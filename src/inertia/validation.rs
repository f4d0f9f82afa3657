//! Validation errors at the boundary between route handlers and the renderer.
//!
//! Page forms route failures back to the originating component as an `errors`
//! prop with status 422. Plain API endpoints answer with a structured 400 body
//! instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::inertia::render::Page;

/// Name of the prop carrying field errors.
pub const ERRORS_PROP: &str = "errors";

/// Field name → message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field is kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(field, message)| (field.clone(), Value::String(message.clone())))
                .collect(),
        )
    }
}

/// Input that can be checked field by field.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

impl Page {
    /// Re-render with `errors` and status 422.
    pub fn with_errors(self, errors: &FieldErrors) -> Self {
        self.prop(ERRORS_PROP, errors.to_value())
            .status(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

/// Generic error body for requests with no originating page.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn invalid(fields: FieldErrors) -> Self {
        Self {
            error: "Validation failed".to_string(),
            fields,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Invalid email");
        errors.add("email", "Email is required");
        errors.add("name", "Name is too short");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(
            errors.to_value(),
            json!({"email": "Invalid email", "name": "Name is too short"})
        );
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("id", "Expected a positive integer");
        assert_eq!(errors.clone().into_result(), Err(errors));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Invalid email");
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"email":"Invalid email"}"#
        );
    }

    #[tokio::test]
    async fn test_api_error_body() {
        let mut fields = FieldErrors::new();
        fields.add("role", "Invalid role");
        let response = ApiError::invalid(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"error": "Validation failed", "fields": {"role": "Invalid role"}})
        );

        let plain = serde_json::to_value(ApiError::new("Bad request")).unwrap();
        assert_eq!(plain, json!({"error": "Bad request"}));
    }
}
