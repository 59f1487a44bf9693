use std::sync::Arc;

use careerai_coach::Responder;
use careerai_persist::{PersistError, PersistenceClient};
use careerai_types::{ChatMessage, ChatSession, NewMessage};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Both records of a completed turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
    /// The session after its activity timestamp was bumped; `None` if that write failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<ChatSession>,
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("failed to save user message: {0}")]
    UserMessage(#[source] PersistError),

    #[error("responder failed: {0}")]
    Responder(String),

    #[error("failed to save assistant reply: {source}")]
    AssistantMessage {
        user_message: ChatMessage,
        #[source]
        source: PersistError,
    },
}

impl TurnError {
    /// The store error behind this failure, if any
    pub fn persist_error(&self) -> Option<&PersistError> {
        match self {
            TurnError::UserMessage(e) => Some(e),
            TurnError::AssistantMessage { source, .. } => Some(source),
            TurnError::Responder(_) => None,
        }
    }
}

/// The write sequence of one turn: user message, reply, assistant message, touch
///
/// Stateless; shared by [`crate::SessionManager`] and the HTTP layer.
#[derive(Clone)]
pub struct TurnExecutor {
    persist: Arc<dyn PersistenceClient>,
    responder: Arc<dyn Responder>,
}

impl TurnExecutor {
    pub fn new(persist: Arc<dyn PersistenceClient>, responder: Arc<dyn Responder>) -> Self {
        Self { persist, responder }
    }

    pub fn responder(&self) -> &Arc<dyn Responder> {
        &self.responder
    }

    pub async fn save(&self, message: NewMessage) -> Result<ChatMessage, PersistError> {
        debug!(
            session_id = %message.session_id,
            role = %message.role,
            "Saving message"
        );
        self.persist.save_message(message).await
    }

    pub async fn compose_reply(&self, prompt: &str) -> Result<String, TurnError> {
        self.responder
            .respond(prompt)
            .await
            .map_err(|e| TurnError::Responder(e.to_string()))
    }

    /// Bump the session's activity timestamp. A failure here is logged and
    /// does not fail the turn.
    pub async fn finish(&self, session_id: &str) -> Option<ChatSession> {
        match self.persist.touch_session(session_id).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(session_id, error = %e, "Failed to update session activity");
                None
            }
        }
    }

    /// Run a whole turn for already-trimmed, non-empty input
    pub async fn run(&self, session_id: &str, text: &str) -> Result<Exchange, TurnError> {
        let user_message = self
            .save(NewMessage::user(session_id, text))
            .await
            .map_err(TurnError::UserMessage)?;

        let reply = self.compose_reply(&user_message.content).await?;

        let assistant_message = match self.save(NewMessage::assistant(session_id, reply)).await {
            Ok(message) => message,
            Err(source) => {
                return Err(TurnError::AssistantMessage {
                    user_message,
                    source,
                })
            }
        };

        let session = self.finish(session_id).await;

        Ok(Exchange {
            user_message,
            assistant_message,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerai_coach::{templates, KeywordResponder};
    use careerai_persist::{Fault, FaultyPersistenceClient, InMemoryPersistenceClient};
    use careerai_types::MessageRole;

    fn executor(persist: Arc<dyn PersistenceClient>) -> TurnExecutor {
        TurnExecutor::new(persist, Arc::new(KeywordResponder::new()))
    }

    #[tokio::test]
    async fn test_run_persists_both_messages_and_touches() {
        let store = Arc::new(InMemoryPersistenceClient::new());
        let session = store.create_session("u1", "t").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let exchange = executor(store.clone())
            .run(&session.id, "How do I negotiate salary?")
            .await
            .unwrap();

        assert_eq!(exchange.user_message.role, MessageRole::User);
        assert_eq!(exchange.assistant_message.content, templates::SALARY_REPLY);
        let touched = exchange.session.unwrap();
        assert!(touched.updated_at > session.updated_at);

        let stored = store.get_messages(&session.id).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_assistant_failure_keeps_user_message() {
        let inner = Arc::new(InMemoryPersistenceClient::new());
        let session = inner.create_session("u1", "t").await.unwrap();
        let faulty = Arc::new(FaultyPersistenceClient::new(inner.clone()));
        faulty.fail(Fault::SaveAssistantMessage);

        let err = executor(faulty).run(&session.id, "hello").await.unwrap_err();
        match err {
            TurnError::AssistantMessage { user_message, .. } => {
                assert_eq!(user_message.content, "hello")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(inner.get_messages(&session.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_touch_failure_does_not_fail_turn() {
        let inner = Arc::new(InMemoryPersistenceClient::new());
        let session = inner.create_session("u1", "t").await.unwrap();
        let faulty = Arc::new(FaultyPersistenceClient::new(inner));
        faulty.fail(Fault::TouchSession);

        let exchange = executor(faulty).run(&session.id, "goal").await.unwrap();
        assert!(exchange.session.is_none());
        assert_eq!(exchange.assistant_message.content, templates::GOAL_REPLY);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = Arc::new(InMemoryPersistenceClient::new());
        let err = executor(store).run("missing", "hi").await.unwrap_err();
        assert!(err.persist_error().is_some_and(|e| e.is_not_found()));
    }
}
