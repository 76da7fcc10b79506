use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::profile::ClaimCategory;

/// Error taxonomy of the alignment core.
///
/// Only `Input` aborts a run. `VocabularyMiss` and `TemplateGap` are recovered
/// where they occur and only ever reach the log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Job text #{index} contains no recognized vocabulary phrase")]
    VocabularyMiss { index: usize },

    #[error("No template defined for {category} claim '{claim_id}'")]
    TemplateGap {
        claim_id: String,
        category: ClaimCategory,
    },
}

impl AlignError {
    pub fn input(msg: impl Into<String>) -> Self {
        AlignError::Input(msg.into())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Align(AlignError::Input(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            // Non-fatal variants are never returned from a run; reaching here is a bug.
            AppError::Align(e) => {
                tracing::error!("Unexpected alignment error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ALIGNMENT_ERROR",
                    "An alignment error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
