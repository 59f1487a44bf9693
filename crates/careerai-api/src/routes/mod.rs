pub mod dashboard;
pub mod goals;
pub mod health;
pub mod messages;
pub mod profiles;
pub mod sessions;
pub mod skills;

use serde::Deserialize;
use utoipa::IntoParams;

/// Owner filter plus optional page size, shared by list endpoints
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Owner of the records
    pub user_id: String,
    /// Maximum number of records (capped by `coach.max_list_limit`)
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub user_id: String,
}
