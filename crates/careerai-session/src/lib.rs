//! Chat session state and the turn-taking protocol of the CareerAI coach.
//!
//! [`SessionManager`] owns one user's view: the session list, the active
//! session and its messages. Every in-memory message carries a
//! [`DeliveryStatus`] so a failed write stays visible and can be retried.
//! [`TurnExecutor`] is the stateless write sequence of a single turn.

pub mod manager;
pub mod state;
pub mod turn;

pub use manager::{SendOutcome, SessionManager};
pub use state::{ChatAction, ChatState, DeliveryStatus, TrackedMessage};
pub use turn::{Exchange, TurnError, TurnExecutor};
