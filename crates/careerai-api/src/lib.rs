//! HTTP service for the CareerAI coaching backend.
//!
//! [`router::build_router`] wires every endpoint over a shared
//! [`state::AppState`]; the `careerai-api` binary adds configuration,
//! logging and the listener.

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
