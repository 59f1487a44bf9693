use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use careerai_coach::Responder;
use careerai_persist::PersistenceClient;
use careerai_session::TurnExecutor;
use careerai_types::CoachConfig;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The turn executor is stateless and created once at startup. Sends are
/// single-flight per session through `in_flight`.
pub struct AppState {
    pub config: Arc<Config>,
    pub coach: CoachConfig,
    pub persist: Arc<dyn PersistenceClient>,
    pub executor: TurnExecutor,
    in_flight: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: Arc<dyn PersistenceClient>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            coach: config.coach_config(),
            config: Arc::new(config),
            executor: TurnExecutor::new(Arc::clone(&persist), responder),
            persist,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Claim the send slot of a session; `None` if a send is already running
    pub fn begin_send(&self, session_id: &str) -> Option<SendSlot<'_>> {
        let mut in_flight = self.in_flight.lock().ok()?;
        if !in_flight.insert(session_id.to_string()) {
            return None;
        }
        Some(SendSlot {
            state: self,
            session_id: session_id.to_string(),
        })
    }
}

/// Releases the session's send slot on drop
pub struct SendSlot<'a> {
    state: &'a AppState,
    session_id: String,
}

impl Drop for SendSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.state.in_flight.lock() {
            in_flight.remove(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerai_coach::KeywordResponder;
    use careerai_persist::InMemoryPersistenceClient;

    #[test]
    fn test_send_slot_is_exclusive_per_session() {
        let state = AppState::new(
            Config::default(),
            Arc::new(InMemoryPersistenceClient::new()),
            Arc::new(KeywordResponder::new()),
        );

        let slot = state.begin_send("s1").unwrap();
        assert!(state.begin_send("s1").is_none());
        assert!(state.begin_send("s2").is_some());

        drop(slot);
        assert!(state.begin_send("s1").is_some());
    }
}
