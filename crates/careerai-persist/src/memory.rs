use std::collections::HashMap;

use async_trait::async_trait;
use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, GoalUpdate, NewGoal, NewMessage, NewSkill, Profile,
    ProfileUpdate, Skill,
};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, Profile>,
    // Vec tables keep insertion order so equal timestamps sort stably
    goals: Vec<CareerGoal>,
    skills: Vec<Skill>,
    sessions: Vec<ChatSession>,
    messages: Vec<ChatMessage>,
}

/// Process-local store for development and tests
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    tables: RwLock<Tables>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(
    rows: &[T],
    owned: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> chrono::DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().filter(|r| owned(*r)).cloned().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    out
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn ping(&self) -> Result<()> {
        let _ = self.tables.read().await;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile> {
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile::new(user_id));
        profile.apply(update);
        Ok(profile.clone())
    }

    async fn list_goals(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<CareerGoal>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            &tables.goals,
            |g| g.user_id == user_id,
            |g| g.created_at,
            limit,
        ))
    }

    async fn get_goal(&self, goal_id: &str) -> Result<Option<CareerGoal>> {
        let tables = self.tables.read().await;
        Ok(tables.goals.iter().find(|g| g.id == goal_id).cloned())
    }

    async fn create_goal(&self, user_id: &str, goal: NewGoal) -> Result<CareerGoal> {
        if goal.title.trim().is_empty() {
            return Err(PersistError::InvalidInput("goal title is required".to_string()));
        }
        let goal = CareerGoal::new(user_id, goal);
        self.tables.write().await.goals.push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<CareerGoal> {
        let mut tables = self.tables.write().await;
        let goal = tables
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| PersistError::GoalNotFound(goal_id.to_string()))?;
        goal.apply(update);
        Ok(goal.clone())
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.goals.len();
        tables.goals.retain(|g| g.id != goal_id);
        if tables.goals.len() == before {
            return Err(PersistError::GoalNotFound(goal_id.to_string()));
        }
        Ok(())
    }

    async fn list_skills(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Skill>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            &tables.skills,
            |s| s.user_id == user_id,
            |s| s.created_at,
            limit,
        ))
    }

    async fn add_skill(&self, user_id: &str, skill: NewSkill) -> Result<Skill> {
        if skill.is_blank() {
            return Err(PersistError::InvalidInput("skill name is required".to_string()));
        }
        let skill = Skill::new(user_id, skill);
        self.tables.write().await.skills.push(skill.clone());
        Ok(skill)
    }

    async fn delete_skill(&self, skill_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.skills.len();
        tables.skills.retain(|s| s.id != skill_id);
        if tables.skills.len() == before {
            return Err(PersistError::SkillNotFound(skill_id.to_string()));
        }
        Ok(())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            &tables.sessions,
            |s| s.user_id == user_id,
            |s| s.updated_at,
            None,
        ))
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn create_session(&self, user_id: &str, title: &str) -> Result<ChatSession> {
        let session = ChatSession::new(user_id, title);
        self.tables.write().await.sessions.push(session.clone());
        Ok(session)
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        let session = tables
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| PersistError::SessionNotFound(session_id.to_string()))?;
        session.title = title.to_string();
        Ok(session.clone())
    }

    async fn touch_session(&self, session_id: &str) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        let session = tables
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| PersistError::SessionNotFound(session_id.to_string()))?;
        session.touch(Utc::now());
        Ok(session.clone())
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|s| !(s.id == session_id && s.user_id == user_id));
        if tables.sessions.len() == before {
            return Err(PersistError::SessionNotFound(session_id.to_string()));
        }
        tables.messages.retain(|m| m.session_id != session_id);
        Ok(())
    }

    async fn save_message(&self, message: NewMessage) -> Result<ChatMessage> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.iter().any(|s| s.id == message.session_id) {
            return Err(PersistError::SessionNotFound(message.session_id));
        }
        let message = message.into_message();
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<ChatMessage> = tables
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }
}
