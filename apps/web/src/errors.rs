use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::LlmError;
use crate::ui::views::ErrorPage;

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`;
/// every variant is shown to the user as an inline failure notice.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported upload: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload exceeds {limit} bytes")]
    UploadTooLarge { limit: usize },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("No resume uploaded")]
    NoResume,

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone()),
            AppError::UploadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "The uploaded file is larger than the {} MB limit.",
                    limit / (1024 * 1024)
                ),
            ),
            AppError::Extract(e @ ExtractError::DocumentParse(_)) => {
                tracing::warn!("Document parse error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The uploaded PDF could not be read. Please upload a different file.".to_string(),
                )
            }
            AppError::Extract(e @ ExtractError::Decode(_)) => {
                tracing::warn!("Decode error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The uploaded text file is not valid UTF-8.".to_string(),
                )
            }
            AppError::NoResume => (
                StatusCode::BAD_REQUEST,
                "📥 Upload a resume to get started.".to_string(),
            ),
            AppError::ModelInvocation(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The language model could not be reached. Please try again.".to_string(),
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The page could not be rendered.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match (ErrorPage { message: &message }).render() {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {e}");
                (status, message).into_response()
            }
        }
    }
}
