//! # CareerAI
//!
//! Backend pieces of a career-coaching application:
//! - **Records** for profiles, career goals, skills, chat sessions and messages
//! - **Keyword coach** mapping a message to one of seven canned replies
//! - **Chat sessions** with per-message delivery state and single-flight sends
//! - **Persistence** behind one async trait, in memory or on MongoDB
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use careerai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (coach, _events) = CoachBuilder::new().user_id("user_123").build().await?;
//!
//!     coach.create_session().await?;
//!     coach.send_turn("How should I prepare for an interview?").await;
//!
//!     for message in coach.snapshot().await.messages {
//!         println!("{}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **careerai-types**: records, payloads, events and config types
//! - **careerai-coach**: the `Responder` trait and `KeywordResponder`
//! - **careerai-persist**: `PersistenceClient` with in-memory and MongoDB backends
//! - **careerai-session**: `SessionManager`, `ChatState` and `TurnExecutor`
//!
//! For the REST service see the `careerai-api` crate in the repository.
//!
//! ## Features
//!
//! - `mongodb`: enable the MongoDB backend

pub use careerai_coach as coach;
pub use careerai_persist as persist;
pub use careerai_session as session;
pub use careerai_types as types;

pub use careerai_coach::{KeywordResponder, Responder};
pub use careerai_persist::{PersistError, PersistenceClient, StoreBackend};
pub use careerai_session::{SendOutcome, SessionManager};
pub use careerai_types::{CoachConfig, CoachEvent};

/// High-level builder for a coaching session manager
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::CoachBuilder;
    pub use crate::session::{DeliveryStatus, SendOutcome, SessionManager};
    pub use crate::types::{
        ChatMessage, ChatSession, CoachConfig, CoachEvent, MessageRole, NoticeLevel,
    };
    pub use anyhow::Result;
}
