use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's profile row; `id` is the user id issued by the auth layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            full_name: String::new(),
            email: String::new(),
            job_title: String::new(),
            experience_years: 0,
            industry: String::new(),
            bio: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the editable fields and bump `updated_at`
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(job_title) = update.job_title {
            self.job_title = job_title;
        }
        if let Some(experience_years) = update.experience_years {
            self.experience_years = experience_years;
        }
        if let Some(industry) = update.industry {
            self.industry = industry;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update from the profile editor. Absent fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
