use async_trait::async_trait;
use chrono::Utc;
use mongodb::{bson::doc, Client};
use tracing::debug;

use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, GoalUpdate, NewGoal, NewMessage, NewSkill, Profile,
    ProfileUpdate, Skill,
};

use crate::dbs::mongo::models::{MongoGoal, MongoMessage, MongoProfile, MongoSession, MongoSkill};
use crate::dbs::mongo::repositories::{
    MongoGoalRepository, MongoMessageRepository, MongoProfileRepository, MongoSessionRepository,
    MongoSkillRepository,
};
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    client: Client,
    database: String,
    profile_repo: MongoProfileRepository,
    goal_repo: MongoGoalRepository,
    skill_repo: MongoSkillRepository,
    session_repo: MongoSessionRepository,
    message_repo: MongoMessageRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            profile_repo: MongoProfileRepository::new(&client, database),
            goal_repo: MongoGoalRepository::new(&client, database),
            skill_repo: MongoSkillRepository::new(&client, database),
            session_repo: MongoSessionRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
            database: database.to_string(),
            client,
        })
    }

    async fn require_session(&self, session_id: &str) -> Result<ChatSession> {
        self.session_repo
            .get_session(session_id)
            .await?
            .map(ChatSession::from)
            .ok_or_else(|| PersistError::SessionNotFound(session_id.to_string()))
    }
}

fn to_limit(limit: Option<usize>) -> Option<i64> {
    limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX))
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.profile_repo.get_profile(user_id).await?.map(Profile::from))
    }

    async fn upsert_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile> {
        let mut profile = self
            .profile_repo
            .get_profile(user_id)
            .await?
            .map(Profile::from)
            .unwrap_or_else(|| Profile::new(user_id));
        profile.apply(update);
        self.profile_repo
            .save_profile(&MongoProfile::from(profile.clone()))
            .await?;
        Ok(profile)
    }

    async fn list_goals(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<CareerGoal>> {
        let goals = self.goal_repo.list_goals(user_id, to_limit(limit)).await?;
        Ok(goals.into_iter().map(CareerGoal::from).collect())
    }

    async fn get_goal(&self, goal_id: &str) -> Result<Option<CareerGoal>> {
        Ok(self.goal_repo.get_goal(goal_id).await?.map(CareerGoal::from))
    }

    async fn create_goal(&self, user_id: &str, goal: NewGoal) -> Result<CareerGoal> {
        if goal.title.trim().is_empty() {
            return Err(PersistError::InvalidInput("goal title is required".to_string()));
        }
        let goal = CareerGoal::new(user_id, goal);
        self.goal_repo.insert_goal(&MongoGoal::from(goal.clone())).await?;
        Ok(goal)
    }

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<CareerGoal> {
        let mut goal: CareerGoal = self
            .goal_repo
            .get_goal(goal_id)
            .await?
            .ok_or_else(|| PersistError::GoalNotFound(goal_id.to_string()))?
            .into();
        goal.apply(update);
        self.goal_repo.replace_goal(&MongoGoal::from(goal.clone())).await?;
        Ok(goal)
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        if !self.goal_repo.delete_goal(goal_id).await? {
            return Err(PersistError::GoalNotFound(goal_id.to_string()));
        }
        Ok(())
    }

    async fn list_skills(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Skill>> {
        let skills = self.skill_repo.list_skills(user_id, to_limit(limit)).await?;
        Ok(skills.into_iter().map(Skill::from).collect())
    }

    async fn add_skill(&self, user_id: &str, skill: NewSkill) -> Result<Skill> {
        if skill.is_blank() {
            return Err(PersistError::InvalidInput("skill name is required".to_string()));
        }
        let skill = Skill::new(user_id, skill);
        self.skill_repo.insert_skill(&MongoSkill::from(skill.clone())).await?;
        Ok(skill)
    }

    async fn delete_skill(&self, skill_id: &str) -> Result<()> {
        if !self.skill_repo.delete_skill(skill_id).await? {
            return Err(PersistError::SkillNotFound(skill_id.to_string()));
        }
        Ok(())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        let sessions = self.session_repo.list_sessions(user_id).await?;
        Ok(sessions.into_iter().map(ChatSession::from).collect())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        Ok(self
            .session_repo
            .get_session(session_id)
            .await?
            .map(ChatSession::from))
    }

    async fn create_session(&self, user_id: &str, title: &str) -> Result<ChatSession> {
        let session = ChatSession::new(user_id, title);
        self.session_repo
            .insert_session(&MongoSession::from(session.clone()))
            .await?;
        Ok(session)
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        let mut session = self.require_session(session_id).await?;
        session.title = title.to_string();
        self.session_repo
            .replace_session(&MongoSession::from(session.clone()))
            .await?;
        Ok(session)
    }

    async fn touch_session(&self, session_id: &str) -> Result<ChatSession> {
        let mut session = self.require_session(session_id).await?;
        session.touch(Utc::now());
        self.session_repo
            .replace_session(&MongoSession::from(session.clone()))
            .await?;
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<()> {
        if !self.session_repo.delete_session(session_id, user_id).await? {
            return Err(PersistError::SessionNotFound(session_id.to_string()));
        }
        let removed = self.message_repo.delete_for_session(session_id).await?;
        debug!(session_id, removed, "Deleted session messages");
        Ok(())
    }

    async fn save_message(&self, message: NewMessage) -> Result<ChatMessage> {
        self.require_session(&message.session_id).await?;
        let message = message.into_message();
        self.message_repo
            .save_message(&MongoMessage::from(message.clone()))
            .await?;
        Ok(message)
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let messages = self.message_repo.get_messages(session_id).await?;
        Ok(messages.into_iter().map(ChatMessage::from).collect())
    }
}
