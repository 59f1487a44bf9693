use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON deserialization error: {0}")]
    BsonDeserialization(#[from] bson::de::Error),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PersistError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PersistError::ProfileNotFound(_)
                | PersistError::GoalNotFound(_)
                | PersistError::SkillNotFound(_)
                | PersistError::SessionNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
