use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use careerai_types::{CareerGoal, GoalStatus, GoalUpdate, NewGoal};

use super::ListQuery;
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGoalRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub goal: NewGoal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GoalStatusRequest {
    pub status: GoalStatus,
}

/// List a user's goals, newest first
#[utoipa::path(
    get,
    path = "/goals",
    params(ListQuery),
    responses(
        (status = 200, description = "Goals", body = [CareerGoal])
    ),
    tag = "goals"
)]
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CareerGoal>>> {
    let limit = state.coach.clamp_limit(query.limit);
    let goals = state.persist.list_goals(&query.user_id, Some(limit)).await?;
    Ok(Json(goals))
}

/// Create a goal
#[utoipa::path(
    post,
    path = "/goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = CareerGoal),
        (status = 400, description = "Missing title")
    ),
    tag = "goals"
)]
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<CareerGoal>)> {
    let goal = state.persist.create_goal(&req.user_id, req.goal).await?;
    tracing::info!(goal_id = %goal.id, user_id = %goal.user_id, "Goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// Edit a goal's fields
#[utoipa::path(
    put,
    path = "/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Goal ID")),
    request_body = GoalUpdate,
    responses(
        (status = 200, description = "Updated goal", body = CareerGoal),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Json<CareerGoal>> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::BadRequest("goal title is required".to_string()));
    }
    let goal = state.persist.update_goal(&goal_id, update).await?;
    Ok(Json(goal))
}

/// Change only a goal's status
#[utoipa::path(
    patch,
    path = "/goals/{goal_id}/status",
    params(("goal_id" = String, Path, description = "Goal ID")),
    request_body = GoalStatusRequest,
    responses(
        (status = 200, description = "Updated goal", body = CareerGoal),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn set_goal_status(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
    Json(req): Json<GoalStatusRequest>,
) -> ApiResult<Json<CareerGoal>> {
    let goal = state.persist.set_goal_status(&goal_id, req.status).await?;
    Ok(Json(goal))
}

/// Delete a goal
#[utoipa::path(
    delete,
    path = "/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Goal ID")),
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.delete_goal(&goal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
