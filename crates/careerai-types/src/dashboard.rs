use serde::{Deserialize, Serialize};

use crate::goal::{CareerGoal, GoalStatus};
use crate::skill::Skill;

pub const DASHBOARD_RECENT_GOALS: usize = 5;
pub const DASHBOARD_RECENT_SKILLS: usize = 6;

/// Progress overview derived from a user's goals and skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardSummary {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub in_progress_goals: usize,
    pub skills_count: usize,
    pub recent_goals: Vec<CareerGoal>,
    pub recent_skills: Vec<Skill>,
}

impl DashboardSummary {
    /// Build from newest-first goal and skill lists
    pub fn from_records(goals: Vec<CareerGoal>, skills: Vec<Skill>) -> Self {
        let count = |status: GoalStatus| goals.iter().filter(|g| g.status == status).count();
        let completed_goals = count(GoalStatus::Completed);
        let in_progress_goals = count(GoalStatus::InProgress);

        Self {
            total_goals: goals.len(),
            completed_goals,
            in_progress_goals,
            skills_count: skills.len(),
            recent_goals: goals.into_iter().take(DASHBOARD_RECENT_GOALS).collect(),
            recent_skills: skills.into_iter().take(DASHBOARD_RECENT_SKILLS).collect(),
        }
    }
}
