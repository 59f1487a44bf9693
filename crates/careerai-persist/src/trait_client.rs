use async_trait::async_trait;
use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, GoalStatus, GoalUpdate, NewGoal, NewMessage, NewSkill,
    Profile, ProfileUpdate, Skill,
};

use crate::error::Result;

/// Record store operations over the five CareerAI tables
///
/// Implementations provide backend-specific CRUD. List operations return
/// records in the order the views expect: goals and skills newest first,
/// sessions by `updated_at` descending, messages by `created_at` ascending.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Cheap round-trip used by health checks
    async fn ping(&self) -> Result<()>;

    // profiles

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Apply an update, creating the row if the auth layer has not yet
    async fn upsert_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile>;

    // career_goals

    async fn list_goals(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<CareerGoal>>;

    async fn get_goal(&self, goal_id: &str) -> Result<Option<CareerGoal>>;

    async fn create_goal(&self, user_id: &str, goal: NewGoal) -> Result<CareerGoal>;

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<CareerGoal>;

    async fn set_goal_status(&self, goal_id: &str, status: GoalStatus) -> Result<CareerGoal> {
        self.update_goal(goal_id, GoalUpdate::status(status)).await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()>;

    // skills

    async fn list_skills(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Skill>>;

    async fn add_skill(&self, user_id: &str, skill: NewSkill) -> Result<Skill>;

    async fn delete_skill(&self, skill_id: &str) -> Result<()>;

    // chat_sessions

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>>;

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>>;

    async fn create_session(&self, user_id: &str, title: &str) -> Result<ChatSession>;

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<ChatSession>;

    /// Bump `updated_at` to now
    async fn touch_session(&self, session_id: &str) -> Result<ChatSession>;

    /// Delete a session owned by `user_id` together with its messages
    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<()>;

    // chat_messages

    /// Insert a message; fails with `SessionNotFound` for unknown sessions
    async fn save_message(&self, message: NewMessage) -> Result<ChatMessage>;

    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;
}
