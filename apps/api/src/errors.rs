use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::recommendation::service::RecommendError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NotFound { .. } => AppError::NotFound(err.to_string()),
            RecommendError::InvalidState { reason, .. } => AppError::Validation(reason),
            RecommendError::Retrieval { .. } => AppError::Retrieval(err.to_string()),
            RecommendError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Retrieval(msg) => {
                tracing::error!("Retrieval error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RETRIEVAL_ERROR",
                    "Server error while fetching recommendations".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Server error while fetching recommendations".to_string(),
                    Some(format!("{e:#}")),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": {
                "code": code,
                "detail": detail
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let job_id = Uuid::new_v4();
        let cases = [
            (RecommendError::NotFound { job_id }, StatusCode::NOT_FOUND),
            (
                RecommendError::InvalidState {
                    job_id,
                    reason: "missing".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RecommendError::Retrieval {
                    job_id,
                    message: "timeout".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RecommendError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_not_found_message_names_the_job() {
        let job_id = Uuid::new_v4();
        match AppError::from(RecommendError::NotFound { job_id }) {
            AppError::NotFound(msg) => assert!(msg.contains(&job_id.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
