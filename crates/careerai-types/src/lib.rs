pub mod chat;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod goal;
pub mod profile;
pub mod skill;

pub use chat::{ChatMessage, ChatSession, MessageRole, NewMessage, DEFAULT_SESSION_TITLE};
pub use config::CoachConfig;
pub use dashboard::DashboardSummary;
pub use events::{CoachEvent, NoticeLevel};
pub use goal::{CareerGoal, GoalStatus, GoalUpdate, NewGoal};
pub use profile::{Profile, ProfileUpdate};
pub use skill::{NewSkill, Proficiency, Skill};
