use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;
use thiserror::Error;

use crate::validate::FieldError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(String),
    #[error("request body is missing")]
    MissingBody,
    #[error("request body is not valid JSON")]
    MalformedBody,
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("request body rejected: {message}")]
    BodyRejected { status: StatusCode, message: String },
    #[error("not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": errors })),
                )
                    .into_response();
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::MissingBody => (
                StatusCode::BAD_REQUEST,
                "Request body must be a JSON document".to_string(),
            ),
            AppError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                "Request body is not valid JSON".to_string(),
            ),
            AppError::BodyRejected { status, message } => (status, message),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
