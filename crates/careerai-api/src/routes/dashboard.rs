use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use careerai_types::DashboardSummary;

use super::UserQuery;
use crate::{error::ApiResult, state::AppState};

/// Goal and skill overview for the dashboard
#[utoipa::path(
    get,
    path = "/dashboard",
    params(UserQuery),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<DashboardSummary>> {
    let (goals, skills) = tokio::try_join!(
        state.persist.list_goals(&query.user_id, None),
        state.persist.list_skills(&query.user_id, None),
    )?;

    Ok(Json(DashboardSummary::from_records(goals, skills)))
}
