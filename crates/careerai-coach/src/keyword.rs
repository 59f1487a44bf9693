use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::templates::{
    CAREER_CHANGE_REPLY, FALLBACK_REPLY, GOAL_REPLY, INTERVIEW_REPLY, RESUME_REPLY, SALARY_REPLY,
    SKILLS_REPLY,
};
use crate::traits::Responder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyTopic {
    Resume,
    Interview,
    CareerChange,
    Skills,
    Salary,
    Goal,
    General,
}

/// Rules in priority order; the first rule with any matching keyword wins.
const RULES: &[(ReplyTopic, &[&str])] = &[
    (ReplyTopic::Resume, &["resume", "cv"]),
    (ReplyTopic::Interview, &["interview"]),
    (ReplyTopic::CareerChange, &["career change", "transition"]),
    (ReplyTopic::Skills, &["skill", "learn"]),
    (ReplyTopic::Salary, &["salary", "negotiate"]),
    (ReplyTopic::Goal, &["goal"]),
];

impl ReplyTopic {
    pub fn template(&self) -> &'static str {
        match self {
            ReplyTopic::Resume => RESUME_REPLY,
            ReplyTopic::Interview => INTERVIEW_REPLY,
            ReplyTopic::CareerChange => CAREER_CHANGE_REPLY,
            ReplyTopic::Skills => SKILLS_REPLY,
            ReplyTopic::Salary => SALARY_REPLY,
            ReplyTopic::Goal => GOAL_REPLY,
            ReplyTopic::General => FALLBACK_REPLY,
        }
    }
}

/// Canned-reply coach driven by substring matches
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

impl KeywordResponder {
    pub fn new() -> Self {
        Self
    }

    /// Pick the topic for a message. Total over all inputs.
    pub fn classify(message: &str) -> ReplyTopic {
        let lower = message.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(topic, _)| *topic)
            .unwrap_or(ReplyTopic::General)
    }

    pub fn reply(message: &str) -> &'static str {
        Self::classify(message).template()
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn respond(&self, prompt: &str) -> Result<String> {
        let topic = Self::classify(prompt);
        tracing::debug!(topic = ?topic, "Selected canned reply");
        Ok(topic.template().to_string())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
