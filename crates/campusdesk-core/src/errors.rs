//! Application error type and its HTTP representation.
//!
//! Every handler and service returns `Result<T, AppError>`. The error carries
//! the HTTP status it maps to, an optional machine-readable `code`, and, for
//! validation failures, the per-field messages.
//!
//! Response body:
//!
//! ```json
//! { "error": "phone is invalid", "code": "validation_error", "fields": { "phone": ["..."] } }
//! ```
//!
//! Server errors never leak their cause; the cause is logged instead.

use std::collections::BTreeMap;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: Option<&'static str>,
    pub error: Error,
    pub fields: Option<FieldErrors>,
    /// Adds the `{status: false, detail}` pair some auth endpoints answer with.
    pub status_flag: bool,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: None,
            error: err.into(),
            fields: None,
            status_flag: false,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into())).with_code("not_authenticated")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into())).with_code("permission_denied")
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect_field_errors(errors, "", &mut fields);

        let summary = fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join(", ");

        let mut error = Self::bad_request(anyhow!(if summary.is_empty() {
            "Invalid input".to_string()
        } else {
            summary
        }))
        .with_code("validation_error");
        error.fields = Some(fields);
        error
    }

    #[must_use]
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_status_flag(mut self) -> Self {
        self.status_flag = true;
        self
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(error));
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn default_message(error: &ValidationError) -> String {
    match &*error.code {
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "invalid length".to_string(),
        },
        "url" => "must be a valid URL".to_string(),
        "range" => "value is out of range".to_string(),
        other => format!("invalid value ({other})"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(error = ?self.error, status = %self.status, "request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let mut body = json!({ "error": message });
        if let Some(code) = self.code {
            body["code"] = json!(code);
        }
        if let Some(fields) = self.fields {
            body["fields"] = json!(fields);
        }
        if self.status_flag {
            body["status"] = json!(false);
            body["detail"] = json!(message);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::not_found(anyhow!("Resource not found")),
            other => AppError::internal(other),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(&errors)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::internal(anyhow!("Password hashing failed: {err}"))
    }
}
