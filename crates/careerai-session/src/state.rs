use careerai_types::{ChatMessage, ChatSession, MessageRole};
use serde::{Deserialize, Serialize};

/// Delivery state of one in-memory message entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Write to the store has not completed
    Pending,
    /// Stored; carries the persisted record
    Confirmed(ChatMessage),
    /// Write failed; the entry stays visible and can be retried
    Failed(String),
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Confirmed(_) => "confirmed",
            DeliveryStatus::Failed(_) => "failed",
        }
    }
}

/// A message as the active view sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedMessage {
    pub local_id: u64,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub status: DeliveryStatus,
    /// User text an assistant entry still has to answer; set until a reply is composed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl TrackedMessage {
    pub fn pending(
        local_id: u64,
        session_id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            local_id,
            session_id: session_id.into(),
            role,
            content: content.into(),
            status: DeliveryStatus::Pending,
            reply_to: None,
        }
    }

    /// Assistant entry whose reply to `prompt` has not been composed yet
    pub fn awaiting_reply(
        local_id: u64,
        session_id: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            reply_to: Some(prompt.into()),
            ..Self::pending(local_id, session_id, MessageRole::Assistant, String::new())
        }
    }

    pub fn confirmed(local_id: u64, message: ChatMessage) -> Self {
        Self {
            local_id,
            session_id: message.session_id.clone(),
            role: message.role,
            content: message.content.clone(),
            status: DeliveryStatus::Confirmed(message),
            reply_to: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, DeliveryStatus::Confirmed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, DeliveryStatus::Failed(_))
    }

    /// The persisted record, once confirmed
    pub fn stored(&self) -> Option<&ChatMessage> {
        match &self.status {
            DeliveryStatus::Confirmed(message) => Some(message),
            _ => None,
        }
    }
}

/// Transitions applied to [`ChatState`]
#[derive(Debug, Clone)]
pub enum ChatAction {
    SessionsLoaded(Vec<ChatSession>),
    SessionCreated(ChatSession),
    SessionSelected {
        session_id: String,
        messages: Vec<ChatMessage>,
    },
    SessionRenamed(ChatSession),
    SessionTouched(ChatSession),
    SessionDeleted(String),
    MessageAppended(TrackedMessage),
    MessageRetrying(u64),
    ReplyComposed {
        local_id: u64,
        content: String,
    },
    MessageConfirmed {
        local_id: u64,
        message: ChatMessage,
    },
    MessageFailed {
        local_id: u64,
        reason: String,
    },
    SendStarted,
    SendFinished,
}

/// State of one user's coaching view
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Ordered by `updated_at` descending
    pub sessions: Vec<ChatSession>,
    pub active_session_id: Option<String>,
    /// Entries of the active session only
    pub messages: Vec<TrackedMessage>,
    pub sending: bool,
    next_local_id: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_local_id(&mut self) -> u64 {
        self.next_local_id += 1;
        self.next_local_id
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.active_session_id.as_deref() == Some(session_id)
    }

    pub fn message(&self, local_id: u64) -> Option<&TrackedMessage> {
        self.messages.iter().find(|m| m.local_id == local_id)
    }

    fn message_mut(&mut self, local_id: u64) -> Option<&mut TrackedMessage> {
        self.messages.iter_mut().find(|m| m.local_id == local_id)
    }

    pub fn apply(&mut self, action: ChatAction) {
        match action {
            ChatAction::SessionsLoaded(sessions) => {
                self.sessions = sessions;
                if let Some(active) = self.active_session_id.as_deref() {
                    if !self.sessions.iter().any(|s| s.id == active) {
                        self.active_session_id = None;
                        self.messages.clear();
                    }
                }
            }
            ChatAction::SessionCreated(session) => {
                self.active_session_id = Some(session.id.clone());
                self.sessions.insert(0, session);
                self.messages.clear();
            }
            ChatAction::SessionSelected {
                session_id,
                messages,
            } => {
                self.active_session_id = Some(session_id);
                self.messages.clear();
                for message in messages {
                    let local_id = self.allocate_local_id();
                    self.messages.push(TrackedMessage::confirmed(local_id, message));
                }
            }
            ChatAction::SessionRenamed(session) => {
                if let Some(existing) = self.sessions.iter_mut().find(|s| s.id == session.id) {
                    *existing = session;
                }
            }
            ChatAction::SessionTouched(session) => {
                // Most recently active first
                self.sessions.retain(|s| s.id != session.id);
                self.sessions.insert(0, session);
            }
            ChatAction::SessionDeleted(session_id) => {
                self.sessions.retain(|s| s.id != session_id);
                if self.is_active(&session_id) {
                    self.active_session_id = None;
                    self.messages.clear();
                }
            }
            ChatAction::MessageAppended(message) => {
                // Entries for a session the view has moved away from are dropped
                if self.is_active(&message.session_id) {
                    self.messages.push(message);
                }
            }
            ChatAction::MessageRetrying(local_id) => {
                if let Some(entry) = self.message_mut(local_id) {
                    if entry.is_failed() {
                        entry.status = DeliveryStatus::Pending;
                    }
                }
            }
            ChatAction::ReplyComposed { local_id, content } => {
                if let Some(entry) = self.message_mut(local_id) {
                    entry.content = content;
                    entry.reply_to = None;
                }
            }
            ChatAction::MessageConfirmed { local_id, message } => {
                if let Some(entry) = self.message_mut(local_id) {
                    entry.status = DeliveryStatus::Confirmed(message);
                }
            }
            ChatAction::MessageFailed { local_id, reason } => {
                if let Some(entry) = self.message_mut(local_id) {
                    entry.status = DeliveryStatus::Failed(reason);
                }
            }
            ChatAction::SendStarted => self.sending = true,
            ChatAction::SendFinished => self.sending = false,
        }
    }
}
