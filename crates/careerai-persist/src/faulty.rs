use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, GoalUpdate, MessageRole, NewGoal, NewMessage, NewSkill,
    Profile, ProfileUpdate, Skill,
};

use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Ping,
    ListSessions,
    CreateSession,
    GetMessages,
    SaveUserMessage,
    SaveAssistantMessage,
    TouchSession,
}

/// Wraps a store and fails selected operations; counts every write attempt
pub struct FaultyPersistenceClient {
    inner: Arc<dyn PersistenceClient>,
    faults: Mutex<HashSet<Fault>>,
    writes: AtomicUsize,
}

impl FaultyPersistenceClient {
    pub fn new(inner: Arc<dyn PersistenceClient>) -> Self {
        Self {
            inner,
            faults: Mutex::new(HashSet::new()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail(&self, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(fault);
        }
    }

    pub fn heal(&self, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.remove(&fault);
        }
    }

    /// Number of write operations attempted so far, failed or not
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, fault: Fault) -> Result<()> {
        let active = self
            .faults
            .lock()
            .map(|faults| faults.contains(&fault))
            .unwrap_or(false);
        if active {
            return Err(PersistError::Connection(format!("injected fault: {fault:?}")));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistenceClient for FaultyPersistenceClient {
    async fn ping(&self) -> Result<()> {
        self.check(Fault::Ping)?;
        self.inner.ping().await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.inner.get_profile(user_id).await
    }

    async fn upsert_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile> {
        self.record_write();
        self.inner.upsert_profile(user_id, update).await
    }

    async fn list_goals(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<CareerGoal>> {
        self.inner.list_goals(user_id, limit).await
    }

    async fn get_goal(&self, goal_id: &str) -> Result<Option<CareerGoal>> {
        self.inner.get_goal(goal_id).await
    }

    async fn create_goal(&self, user_id: &str, goal: NewGoal) -> Result<CareerGoal> {
        self.record_write();
        self.inner.create_goal(user_id, goal).await
    }

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<CareerGoal> {
        self.record_write();
        self.inner.update_goal(goal_id, update).await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        self.record_write();
        self.inner.delete_goal(goal_id).await
    }

    async fn list_skills(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Skill>> {
        self.inner.list_skills(user_id, limit).await
    }

    async fn add_skill(&self, user_id: &str, skill: NewSkill) -> Result<Skill> {
        self.record_write();
        self.inner.add_skill(user_id, skill).await
    }

    async fn delete_skill(&self, skill_id: &str) -> Result<()> {
        self.record_write();
        self.inner.delete_skill(skill_id).await
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        self.check(Fault::ListSessions)?;
        self.inner.list_sessions(user_id).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        self.inner.get_session(session_id).await
    }

    async fn create_session(&self, user_id: &str, title: &str) -> Result<ChatSession> {
        self.record_write();
        self.check(Fault::CreateSession)?;
        self.inner.create_session(user_id, title).await
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        self.record_write();
        self.inner.rename_session(session_id, title).await
    }

    async fn touch_session(&self, session_id: &str) -> Result<ChatSession> {
        self.record_write();
        self.check(Fault::TouchSession)?;
        self.inner.touch_session(session_id).await
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<()> {
        self.record_write();
        self.inner.delete_session(session_id, user_id).await
    }

    async fn save_message(&self, message: NewMessage) -> Result<ChatMessage> {
        self.record_write();
        match message.role {
            MessageRole::User => self.check(Fault::SaveUserMessage)?,
            MessageRole::Assistant => self.check(Fault::SaveAssistantMessage)?,
        }
        self.inner.save_message(message).await
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        self.check(Fault::GetMessages)?;
        self.inner.get_messages(session_id).await
    }
}
