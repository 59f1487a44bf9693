use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use careerai_coach::Responder;
use careerai_persist::{PersistError, PersistenceClient};
use careerai_types::{ChatMessage, ChatSession, CoachConfig, CoachEvent, MessageRole, NewMessage};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::state::{ChatAction, ChatState, TrackedMessage};
use crate::turn::TurnExecutor;

/// Result of a send or retry request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Both messages of the turn were stored
    Sent,
    /// Input was blank after trimming
    Empty,
    NoSession,
    /// Another send is in flight; the request was dropped
    Busy,
    /// A store write failed; see the failed entry and the emitted notice
    Failed,
    /// The entry does not exist or has not failed
    NothingToRetry,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one user's coaching view against the record store
///
/// Store failures never escape as panics: each one is logged and turned into
/// a destructive [`CoachEvent::Notice`] on the event channel.
pub struct SessionManager {
    user_id: String,
    persist: Arc<dyn PersistenceClient>,
    executor: TurnExecutor,
    config: CoachConfig,
    state: Mutex<ChatState>,
    sending: AtomicBool,
    events: mpsc::Sender<CoachEvent>,
}

impl SessionManager {
    pub fn new(
        user_id: impl Into<String>,
        persist: Arc<dyn PersistenceClient>,
        responder: Arc<dyn Responder>,
        config: CoachConfig,
    ) -> (Self, mpsc::Receiver<CoachEvent>) {
        let (events, rx) = mpsc::channel(config.event_buffer.max(1));
        let manager = Self {
            user_id: user_id.into(),
            executor: TurnExecutor::new(Arc::clone(&persist), responder),
            persist,
            config,
            state: Mutex::new(ChatState::new()),
            sending: AtomicBool::new(false),
            events,
        };
        (manager, rx)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Snapshot of the current view state
    pub async fn snapshot(&self) -> ChatState {
        self.state.lock().await.clone()
    }

    async fn dispatch(&self, action: ChatAction) {
        self.state.lock().await.apply(action);
    }

    fn emit(&self, event: CoachEvent) {
        if let Err(e) = self.events.try_send(event) {
            debug!(error = %e, "Dropped coach event");
        }
    }

    fn notify_failure(&self, description: &str, err: &PersistError) {
        error!(user_id = %self.user_id, error = %err, "{}", description);
        self.emit(CoachEvent::error(description));
    }

    /// Load the user's sessions, newest activity first. Selects the first one
    /// when nothing is selected yet.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>, PersistError> {
        let sessions = match self.persist.list_sessions(&self.user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                self.notify_failure("Failed to load conversations", &e);
                return Err(e);
            }
        };
        info!(user_id = %self.user_id, count = sessions.len(), "Loaded sessions");

        let first = {
            let mut state = self.state.lock().await;
            state.apply(ChatAction::SessionsLoaded(sessions.clone()));
            match state.active_session_id {
                None => sessions.first().map(|s| s.id.clone()),
                Some(_) => None,
            }
        };
        self.emit(CoachEvent::SessionsLoaded {
            count: sessions.len(),
        });

        if let Some(session_id) = first {
            self.select_session(&session_id).await?;
        }
        Ok(sessions)
    }

    /// Create an empty session, put it first and select it
    pub async fn create_session(&self) -> Result<ChatSession, PersistError> {
        let session = match self
            .persist
            .create_session(&self.user_id, &self.config.default_session_title)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                self.notify_failure("Failed to create new session", &e);
                return Err(e);
            }
        };
        info!(session_id = %session.id, "Created session");

        self.dispatch(ChatAction::SessionCreated(session.clone())).await;
        self.emit(CoachEvent::SessionSelected {
            session_id: session.id.clone(),
        });
        Ok(session)
    }

    /// Make a session active and replace the message list with its history
    pub async fn select_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, PersistError> {
        let messages = match self.persist.get_messages(session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                self.notify_failure("Failed to load messages", &e);
                return Err(e);
            }
        };
        debug!(session_id, count = messages.len(), "Loaded messages");

        self.dispatch(ChatAction::SessionSelected {
            session_id: session_id.to_string(),
            messages: messages.clone(),
        })
        .await;
        self.emit(CoachEvent::SessionSelected {
            session_id: session_id.to_string(),
        });
        Ok(messages)
    }

    pub async fn rename_session(
        &self,
        session_id: &str,
        title: &str,
    ) -> Result<ChatSession, PersistError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PersistError::InvalidInput("title is required".to_string()));
        }
        match self.persist.rename_session(session_id, title).await {
            Ok(session) => {
                self.dispatch(ChatAction::SessionRenamed(session.clone())).await;
                Ok(session)
            }
            Err(e) => {
                self.notify_failure("Failed to rename session", &e);
                Err(e)
            }
        }
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), PersistError> {
        if let Err(e) = self.persist.delete_session(session_id, &self.user_id).await {
            self.notify_failure("Failed to delete session", &e);
            return Err(e);
        }
        info!(session_id, "Deleted session");
        self.dispatch(ChatAction::SessionDeleted(session_id.to_string()))
            .await;
        Ok(())
    }

    fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.sending))
    }

    /// Send one turn in the active session
    pub async fn send_turn(&self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }
        let Some(session_id) = self.state.lock().await.active_session_id.clone() else {
            return SendOutcome::NoSession;
        };
        let Some(_guard) = self.try_acquire() else {
            warn!(session_id = %session_id, "Send rejected, another send is in flight");
            return SendOutcome::Busy;
        };

        let local_id = {
            let mut state = self.state.lock().await;
            state.apply(ChatAction::SendStarted);
            let local_id = state.allocate_local_id();
            state.apply(ChatAction::MessageAppended(TrackedMessage::pending(
                local_id,
                &session_id,
                MessageRole::User,
                text,
            )));
            local_id
        };

        let outcome = self.drive_from_user(&session_id, local_id, text).await;
        self.dispatch(ChatAction::SendFinished).await;
        outcome
    }

    /// Re-attempt the remaining steps of the turn a failed entry belongs to
    pub async fn retry(&self, local_id: u64) -> SendOutcome {
        let Some(_guard) = self.try_acquire() else {
            return SendOutcome::Busy;
        };

        let entry = {
            let mut state = self.state.lock().await;
            match state.message(local_id) {
                Some(entry) if entry.is_failed() => {
                    let entry = entry.clone();
                    state.apply(ChatAction::MessageRetrying(local_id));
                    state.apply(ChatAction::SendStarted);
                    entry
                }
                _ => return SendOutcome::NothingToRetry,
            }
        };
        info!(local_id, role = %entry.role, "Retrying message");
        self.emit_status(local_id, "pending");

        let outcome = match entry.role {
            MessageRole::User => {
                self.drive_from_user(&entry.session_id, local_id, &entry.content)
                    .await
            }
            MessageRole::Assistant => match entry.reply_to {
                Some(prompt) => self.answer(&entry.session_id, local_id, &prompt).await,
                None => {
                    let message = NewMessage::assistant(&entry.session_id, entry.content);
                    self.store_reply(&entry.session_id, local_id, message).await
                }
            },
        };
        self.dispatch(ChatAction::SendFinished).await;
        outcome
    }

    async fn drive_from_user(&self, session_id: &str, local_id: u64, text: &str) -> SendOutcome {
        let Some(user_message) = self
            .persist_entry(local_id, NewMessage::user(session_id, text))
            .await
        else {
            return SendOutcome::Failed;
        };

        let reply_id = {
            let mut state = self.state.lock().await;
            let reply_id = state.allocate_local_id();
            state.apply(ChatAction::MessageAppended(TrackedMessage::awaiting_reply(
                reply_id,
                session_id,
                user_message.content.clone(),
            )));
            reply_id
        };

        self.answer(session_id, reply_id, &user_message.content).await
    }

    /// Compose the reply to `prompt` into entry `reply_id`, then store it
    async fn answer(&self, session_id: &str, reply_id: u64, prompt: &str) -> SendOutcome {
        let reply = match self.executor.compose_reply(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(session_id, error = %e, "Failed to compose reply");
                self.dispatch(ChatAction::MessageFailed {
                    local_id: reply_id,
                    reason: e.to_string(),
                })
                .await;
                self.emit_status(reply_id, "failed");
                self.emit(CoachEvent::error("Failed to send message"));
                return SendOutcome::Failed;
            }
        };

        self.dispatch(ChatAction::ReplyComposed {
            local_id: reply_id,
            content: reply.clone(),
        })
        .await;
        self.store_reply(session_id, reply_id, NewMessage::assistant(session_id, reply))
            .await
    }

    async fn store_reply(
        &self,
        session_id: &str,
        reply_id: u64,
        message: NewMessage,
    ) -> SendOutcome {
        if self.persist_entry(reply_id, message).await.is_none() {
            return SendOutcome::Failed;
        }
        self.finish_turn(session_id).await;
        SendOutcome::Sent
    }

    /// Write one message and move its entry to confirmed or failed
    async fn persist_entry(&self, local_id: u64, message: NewMessage) -> Option<ChatMessage> {
        match self.executor.save(message).await {
            Ok(stored) => {
                self.dispatch(ChatAction::MessageConfirmed {
                    local_id,
                    message: stored.clone(),
                })
                .await;
                self.emit_status(local_id, "confirmed");
                Some(stored)
            }
            Err(e) => {
                self.dispatch(ChatAction::MessageFailed {
                    local_id,
                    reason: e.to_string(),
                })
                .await;
                self.emit_status(local_id, "failed");
                self.notify_failure("Failed to send message", &e);
                None
            }
        }
    }

    async fn finish_turn(&self, session_id: &str) {
        if let Some(session) = self.executor.finish(session_id).await {
            self.dispatch(ChatAction::SessionTouched(session)).await;
        }
    }

    fn emit_status(&self, local_id: u64, status: &str) {
        self.emit(CoachEvent::MessageUpdated {
            local_id,
            status: status.to_string(),
        });
    }
}
