use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use careerai_types::ChatSession;

use super::UserQuery;
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub user_id: String,
    /// Defaults to `coach.default_session_title`
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameSessionRequest {
    pub title: String,
}

/// List a user's sessions, most recently active first
#[utoipa::path(
    get,
    path = "/sessions",
    params(UserQuery),
    responses(
        (status = 200, description = "Sessions", body = [ChatSession])
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<ChatSession>>> {
    let sessions = state.persist.list_sessions(&query.user_id).await?;
    Ok(Json(sessions))
}

/// Start a new conversation
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = ChatSession)
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<ChatSession>)> {
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(state.coach.default_session_title.as_str());

    let session = state.persist.create_session(&req.user_id, title).await?;
    tracing::info!(session_id = %session.id, user_id = %session.user_id, "Session created");

    Ok((StatusCode::CREATED, Json(session)))
}

/// Get a session
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session", body = ChatSession),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ChatSession>> {
    let session = state
        .persist
        .get_session(&session_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(session))
}

/// Rename a session
#[utoipa::path(
    patch,
    path = "/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Session ID")),
    request_body = RenameSessionRequest,
    responses(
        (status = 200, description = "Renamed session", body = ChatSession),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn rename_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<RenameSessionRequest>,
) -> ApiResult<Json<ChatSession>> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let session = state.persist.rename_session(&session_id, title).await?;
    Ok(Json(session))
}

/// Delete a session and its messages
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID"),
        UserQuery
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found for this user")
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<StatusCode> {
    state
        .persist
        .delete_session(&session_id, &query.user_id)
        .await?;
    tracing::info!(session_id = %session_id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}
