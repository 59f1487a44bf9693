use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use careerai_types::{Profile, ProfileUpdate};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/profiles/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let profile = state
        .persist
        .get_profile(&user_id)
        .await?
        .ok_or(ApiError::ProfileNotFound(user_id))?;

    Ok(Json(profile))
}

/// Update a user's profile, creating it if missing
#[utoipa::path(
    put,
    path = "/profiles/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = Profile)
    ),
    tag = "profiles"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    let profile = state.persist.upsert_profile(&user_id, update).await?;
    tracing::info!(user_id = %user_id, "Profile updated");
    Ok(Json(profile))
}
