use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::AiError;
use crate::project::merge::MergeError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    #[error("Improvement rejected: {0}")]
    Merge(#[from] MergeError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Merge(e) => (StatusCode::BAD_REQUEST, "INVALID_IMPROVEMENT", e.to_string()),
            AppError::Ai(e) => ai_response(e),
            AppError::Store(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
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

/// The AI taxonomy keeps its distinctions on the wire: a misconfigured
/// deployment, an upstream failure, an empty answer, and unparseable model
/// output each get their own code.
fn ai_response(error: &AiError) -> (StatusCode, &'static str, String) {
    match error {
        AiError::MissingApiKey => (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI_NOT_CONFIGURED",
            error.to_string(),
        ),
        AiError::Http(e) => {
            tracing::error!("AI transport error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "AI_UPSTREAM_ERROR",
                "The AI provider could not be reached".to_string(),
            )
        }
        AiError::Api { status, message } => {
            tracing::error!("AI provider rejected the call (status {status}): {message}");
            (
                StatusCode::BAD_GATEWAY,
                "AI_UPSTREAM_ERROR",
                message.clone(),
            )
        }
        AiError::EmptyResponse => (
            StatusCode::BAD_GATEWAY,
            "AI_EMPTY_RESPONSE",
            error.to_string(),
        ),
        AiError::MalformedOutput(e) => {
            tracing::error!("Unparseable AI output: {e}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "AI_MALFORMED_OUTPUT",
                "The model output could not be parsed".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let response = AppError::Conflict("stale".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_ai_taxonomy_keeps_distinct_statuses() {
        let config = AppError::Ai(AiError::MissingApiKey).into_response();
        assert_eq!(config.status(), StatusCode::SERVICE_UNAVAILABLE);

        let empty = AppError::Ai(AiError::EmptyResponse).into_response();
        assert_eq!(empty.status(), StatusCode::BAD_GATEWAY);

        let malformed =
            AppError::Ai(AiError::MalformedOutput("bad".to_string())).into_response();
        assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rejected_improvement_is_a_client_error() {
        let error = AppError::Merge(MergeError::UnknownSection("hobbies".to_string()));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
