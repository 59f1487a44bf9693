use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use careerai_types::ChatMessage;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Message history of a session, oldest first
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/messages",
    params(("session_id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Messages", body = [ChatMessage]),
        (status = 404, description = "Session not found")
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    if state.persist.get_session(&session_id).await?.is_none() {
        return Err(ApiError::SessionNotFound(session_id));
    }

    let messages = state.persist.get_messages(&session_id).await?;
    Ok(Json(messages))
}

/// Send a user message and store the coach's reply
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/messages",
    params(("session_id" = String, Path, description = "Session ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Stored turn", body = SendMessageResponse),
        (status = 400, description = "Blank message"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "A send is already in progress for this session"),
        (status = 500, description = "Store failure")
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let text = req.content.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("message content is required".to_string()));
    }

    let Some(_slot) = state.begin_send(&session_id) else {
        tracing::warn!(session_id = %session_id, "Concurrent send rejected");
        return Err(ApiError::SendInProgress(session_id));
    };

    let exchange = state.executor.run(&session_id, text).await?;
    tracing::info!(
        session_id = %session_id,
        user_message_id = %exchange.user_message.id,
        assistant_message_id = %exchange.assistant_message.id,
        "Turn stored"
    );

    Ok(Json(SendMessageResponse {
        user_message: exchange.user_message,
        assistant_message: exchange.assistant_message,
    }))
}
