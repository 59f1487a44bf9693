use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use careerai_types::{NewSkill, Skill};

use super::ListQuery;
use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddSkillRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub skill: NewSkill,
}

/// List a user's skills, newest first
#[utoipa::path(
    get,
    path = "/skills",
    params(ListQuery),
    responses(
        (status = 200, description = "Skills", body = [Skill])
    ),
    tag = "skills"
)]
pub async fn list_skills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Skill>>> {
    let limit = state.coach.clamp_limit(query.limit);
    let skills = state.persist.list_skills(&query.user_id, Some(limit)).await?;
    Ok(Json(skills))
}

/// Add a skill
#[utoipa::path(
    post,
    path = "/skills",
    request_body = AddSkillRequest,
    responses(
        (status = 201, description = "Skill added", body = Skill),
        (status = 400, description = "Blank name")
    ),
    tag = "skills"
)]
pub async fn add_skill(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddSkillRequest>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    let skill = state.persist.add_skill(&req.user_id, req.skill).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// Remove a skill
#[utoipa::path(
    delete,
    path = "/skills/{skill_id}",
    params(("skill_id" = String, Path, description = "Skill ID")),
    responses(
        (status = 204, description = "Skill deleted"),
        (status = 404, description = "Skill not found")
    ),
    tag = "skills"
)]
pub async fn delete_skill(
    State(state): State<Arc<AppState>>,
    Path(skill_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.delete_skill(&skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
