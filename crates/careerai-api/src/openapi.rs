use utoipa::OpenApi;

use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, DashboardSummary, GoalStatus, GoalUpdate, MessageRole,
    NewGoal, NewSkill, Proficiency, Profile, ProfileUpdate, Skill,
};

use crate::routes::{dashboard, goals, health, messages, profiles, sessions, skills};

#[derive(OpenApi)]
#[openapi(
    info(title = "CareerAI API", description = "Career coaching backend"),
    paths(
        health::health_check,
        profiles::get_profile,
        profiles::update_profile,
        dashboard::get_dashboard,
        goals::list_goals,
        goals::create_goal,
        goals::update_goal,
        goals::set_goal_status,
        goals::delete_goal,
        skills::list_skills,
        skills::add_skill,
        skills::delete_skill,
        sessions::list_sessions,
        sessions::create_session,
        sessions::get_session,
        sessions::rename_session,
        sessions::delete_session,
        messages::list_messages,
        messages::send_message,
    ),
    components(schemas(
        health::HealthResponse,
        Profile,
        ProfileUpdate,
        DashboardSummary,
        CareerGoal,
        NewGoal,
        GoalUpdate,
        GoalStatus,
        goals::CreateGoalRequest,
        goals::GoalStatusRequest,
        Skill,
        NewSkill,
        Proficiency,
        skills::AddSkillRequest,
        ChatSession,
        ChatMessage,
        MessageRole,
        sessions::CreateSessionRequest,
        sessions::RenameSessionRequest,
        messages::SendMessageRequest,
        messages::SendMessageResponse,
    )),
    tags(
        (name = "health"),
        (name = "profiles"),
        (name = "dashboard"),
        (name = "goals"),
        (name = "skills"),
        (name = "sessions"),
        (name = "messages")
    )
)]
pub struct ApiDoc;
