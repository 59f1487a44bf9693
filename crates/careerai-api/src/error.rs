use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use careerai_persist::PersistError;
use careerai_session::TurnError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("A message is already being sent in session {0}")]
    SendInProgress(String),

    #[error("Persistence error: {0}")]
    Persist(PersistError),

    #[error("Turn failed: {0}")]
    Turn(TurnError),

    #[error("Internal server error")]
    Internal,
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::SessionNotFound(id) => ApiError::SessionNotFound(id),
            PersistError::GoalNotFound(id) => ApiError::GoalNotFound(id),
            PersistError::SkillNotFound(id) => ApiError::SkillNotFound(id),
            PersistError::ProfileNotFound(id) => ApiError::ProfileNotFound(id),
            PersistError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Persist(other),
        }
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::UserMessage(PersistError::SessionNotFound(id)) => {
                ApiError::SessionNotFound(id)
            }
            other => ApiError::Turn(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(_)
            | ApiError::GoalNotFound(_)
            | ApiError::SkillNotFound(_)
            | ApiError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::SendInProgress(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Turn(ref e) => {
                tracing::error!("Turn error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message".to_string())
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
