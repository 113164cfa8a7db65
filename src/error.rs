use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;

use crate::chatkit::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingConfiguration(String),
    #[error("Missing workflow id")]
    MissingWorkflowId,
    #[error("Session creation failed: {message}")]
    SessionCreationFailed { status: u16, message: String },
    #[error("Failed to process message: {0}")]
    ChatRequestFailed(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Maps a failed `/v1/chatkit/sessions` call onto the response the browser sees.
    pub fn from_session_upstream(err: UpstreamError) -> Self {
        match err {
            UpstreamError::MissingApiKey => AppError::MissingConfiguration(err.to_string()),
            UpstreamError::Rejected { status, message } => AppError::SessionCreationFailed {
                status: status.as_u16(),
                message,
            },
            UpstreamError::Transport(_) | UpstreamError::InvalidResponse(_) => {
                AppError::SessionCreationFailed {
                    status: 500,
                    message: err.to_string(),
                }
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingWorkflowId | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::SessionCreationFailed { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::MissingConfiguration(_)
            | AppError::ChatRequestFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            error!("Unexpected error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
