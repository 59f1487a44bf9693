use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Skill {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub proficiency: Proficiency,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    pub fn new(user_id: impl Into<String>, skill: NewSkill) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: skill.name.trim().to_string(),
            proficiency: skill.proficiency,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewSkill {
    pub name: String,
    #[serde(default)]
    pub proficiency: Proficiency,
}

impl NewSkill {
    pub fn new(name: impl Into<String>, proficiency: Proficiency) -> Self {
        Self {
            name: name.into(),
            proficiency,
        }
    }

    /// Blank names are never stored
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}
