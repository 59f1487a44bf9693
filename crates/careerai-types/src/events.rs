use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Destructive,
}

/// Events emitted by a coaching view for the presentation layer to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoachEvent {
    /// Session list was (re)loaded
    SessionsLoaded {
        count: usize,
    },

    /// The active session changed
    SessionSelected {
        session_id: String,
    },

    /// A message entry was appended or changed state
    MessageUpdated {
        local_id: u64,
        status: String,
    },

    /// Transient user-facing notification (toast)
    Notice {
        level: NoticeLevel,
        title: String,
        description: String,
    },
}

impl CoachEvent {
    pub fn error(description: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Destructive,
            title: "Error".to_string(),
            description: description.into(),
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            title: "Success".to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CoachEvent::Notice {
                level: NoticeLevel::Destructive,
                ..
            }
        )
    }
}
