use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Render validation errors as a nested map keyed by field name.
///
/// Leaf fields map to the list of their messages, nested objects map to
/// another map, list entries are keyed by their index.
pub fn validation_errors_to_json(errors: &ValidationErrors) -> Value {
    let mut map = Map::new();
    for (field, kind) in errors.errors() {
        let entry = match kind {
            ValidationErrorsKind::Field(errs) => Value::Array(
                errs.iter()
                    .map(|err| {
                        let message = err.message.as_deref().unwrap_or(&err.code);
                        Value::String(message.to_string())
                    })
                    .collect(),
            ),
            ValidationErrorsKind::Struct(nested) => validation_errors_to_json(nested),
            ValidationErrorsKind::List(items) => Value::Object(
                items
                    .iter()
                    .map(|(index, nested)| (index.to_string(), validation_errors_to_json(nested)))
                    .collect(),
            ),
        };
        map.insert((*field).to_string(), entry);
    }
    Value::Object(map)
}

/// Flatten validation errors into dotted field paths, sorted.
pub fn validation_error_paths(errors: &ValidationErrors) -> Vec<String> {
    fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                (*field).to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(_) => out.push(path),
                ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        collect(&format!("{path}.{index}"), nested, out);
                    }
                }
            }
        }
    }

    let mut paths = Vec::new();
    collect("", errors, &mut paths);
    paths.sort();
    paths
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            fields: Option<Value>,
        }

        let (status, error_message, details, fields) = match self {
            AppError::ValidationError(err) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                None,
                Some(validation_errors_to_json(&err)),
            ),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None, None),
            AppError::UnsupportedMediaType(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg, None, None)
            }
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                    None,
                )
            }
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
                None,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
                fields,
            }),
        )
            .into_response()
    }
}
