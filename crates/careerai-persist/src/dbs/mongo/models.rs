use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use careerai_types::{
    CareerGoal, ChatMessage, ChatSession, GoalStatus, MessageRole, Profile, Proficiency, Skill,
};

// Timestamps are stored as BSON dates so server-side sorts are chronological

/// MongoDB-specific Profile model (`_id` is the user id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
    pub experience_years: u32,
    pub industry: String,
    pub bio: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGoal {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSkill {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub proficiency: Proficiency,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Insertion order; breaks ties between messages saved in the same millisecond
    #[serde(default)]
    pub seq: i64,
}

static LAST_MESSAGE_SEQ: AtomicI64 = AtomicI64::new(0);

/// Microseconds of `created_at`, bumped past the last value handed out
fn next_message_seq(created_at: DateTime<Utc>) -> i64 {
    let candidate = created_at.timestamp_micros();
    let previous = LAST_MESSAGE_SEQ
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(candidate.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    candidate.max(previous + 1)
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<Profile> for MongoProfile {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            job_title: p.job_title,
            experience_years: p.experience_years,
            industry: p.industry,
            bio: p.bio,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<MongoProfile> for Profile {
    fn from(p: MongoProfile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            job_title: p.job_title,
            experience_years: p.experience_years,
            industry: p.industry,
            bio: p.bio,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CareerGoal> for MongoGoal {
    fn from(g: CareerGoal) -> Self {
        Self {
            id: g.id,
            user_id: g.user_id,
            title: g.title,
            description: g.description,
            target_date: g.target_date,
            status: g.status,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

impl From<MongoGoal> for CareerGoal {
    fn from(g: MongoGoal) -> Self {
        Self {
            id: g.id,
            user_id: g.user_id,
            title: g.title,
            description: g.description,
            target_date: g.target_date,
            status: g.status,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

impl From<Skill> for MongoSkill {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            name: s.name,
            proficiency: s.proficiency,
            created_at: s.created_at,
        }
    }
}

impl From<MongoSkill> for Skill {
    fn from(s: MongoSkill) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            name: s.name,
            proficiency: s.proficiency,
            created_at: s.created_at,
        }
    }
}

impl From<ChatSession> for MongoSession {
    fn from(s: ChatSession) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            title: s.title,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<MongoSession> for ChatSession {
    fn from(s: MongoSession) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            title: s.title,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<ChatMessage> for MongoMessage {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            role: m.role,
            content: m.content,
            seq: next_message_seq(m.created_at),
            created_at: m.created_at,
        }
    }
}

impl From<MongoMessage> for ChatMessage {
    fn from(m: MongoMessage) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerai_types::{NewGoal, NewMessage};
    use chrono::NaiveDate;
    use mongodb::bson::{self, Bson};

    #[test]
    fn test_goal_document_shape() {
        let goal = CareerGoal::new(
            "u1",
            NewGoal::new("Lead a team")
                .with_target_date(NaiveDate::from_ymd_opt(2027, 1, 31).unwrap()),
        );
        let doc = bson::to_document(&MongoGoal::from(goal.clone())).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), goal.id);
        assert_eq!(doc.get_str("status").unwrap(), "pending");
        assert_eq!(doc.get_str("target_date").unwrap(), "2027-01-31");
        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));

        let back: MongoGoal = bson::from_document(doc).unwrap();
        assert_eq!(CareerGoal::from(back).title, "Lead a team");
    }

    #[test]
    fn test_messages_saved_in_same_instant_keep_insertion_order() {
        let user = NewMessage::user("s1", "hello").into_message();
        let mut reply = NewMessage::assistant("s1", "hi there").into_message();
        reply.created_at = user.created_at;

        let first = MongoMessage::from(user);
        let second = MongoMessage::from(reply);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.seq > first.seq);

        let doc = bson::to_document(&second).unwrap();
        assert_eq!(doc.get_i64("seq").unwrap(), second.seq);
    }

    #[test]
    fn test_message_without_seq_still_loads() {
        let message = NewMessage::user("s1", "hello").into_message();
        let mut doc = bson::to_document(&MongoMessage::from(message)).unwrap();
        doc.remove("seq");

        let back: MongoMessage = bson::from_document(doc).unwrap();
        assert_eq!(back.seq, 0);
        assert_eq!(ChatMessage::from(back).content, "hello");
    }
}
