//! Error responses for the HTTP API

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::RedlineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Redline(#[from] RedlineError),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::InvalidRequest(format!("Malformed upload: {}", err.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Redline(RedlineError::TemplateNotFound(name)) => (
                StatusCode::NOT_FOUND,
                format!("Template '{}' not found", name),
            ),
            ApiError::Redline(RedlineError::InvalidScenario(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Redline(RedlineError::DocumentParse(e)) => {
                tracing::warn!("Rejected upload: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Failed to process the document.".to_string(),
                )
            }
            ApiError::Redline(RedlineError::DocumentGeneration(e)) => {
                tracing::error!("Document generation error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not generate the document.".to_string(),
                )
            }
            ApiError::Redline(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
