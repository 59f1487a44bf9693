use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use careerai_coach::{templates, KeywordResponder, Responder};
use careerai_persist::{Fault, FaultyPersistenceClient, InMemoryPersistenceClient, PersistenceClient};
use careerai_session::{DeliveryStatus, SendOutcome, SessionManager};
use careerai_types::{CoachConfig, CoachEvent, MessageRole, NewMessage};
use tokio::sync::{mpsc, Notify};

struct Harness {
    manager: Arc<SessionManager>,
    events: mpsc::Receiver<CoachEvent>,
    store: Arc<InMemoryPersistenceClient>,
    faulty: Arc<FaultyPersistenceClient>,
}

fn harness_with(responder: Arc<dyn Responder>) -> Harness {
    let store = Arc::new(InMemoryPersistenceClient::new());
    let faulty = Arc::new(FaultyPersistenceClient::new(store.clone()));
    let (manager, events) =
        SessionManager::new("u1", faulty.clone(), responder, CoachConfig::default());
    Harness {
        manager: Arc::new(manager),
        events,
        store,
        faulty,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(KeywordResponder::new()))
}

fn drain(events: &mut mpsc::Receiver<CoachEvent>) -> Vec<CoachEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Holds every reply until released
struct GatedResponder {
    gate: Arc<Notify>,
}

#[async_trait]
impl Responder for GatedResponder {
    async fn respond(&self, prompt: &str) -> Result<String> {
        self.gate.notified().await;
        Ok(KeywordResponder::reply(prompt).to_string())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Fails its first call, then answers like the keyword responder
struct FlakyResponder {
    failed_once: AtomicBool,
}

#[async_trait]
impl Responder for FlakyResponder {
    async fn respond(&self, prompt: &str) -> Result<String> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            bail!("responder unavailable");
        }
        Ok(KeywordResponder::reply(prompt).to_string())
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::test]
async fn test_list_selects_most_recent_session() {
    let h = harness();
    let older = h.store.create_session("u1", "older").await.unwrap();
    let newer = h.store.create_session("u1", "newer").await.unwrap();
    h.store
        .save_message(NewMessage::user(&newer.id, "hi"))
        .await
        .unwrap();
    h.store.create_session("u2", "not mine").await.unwrap();

    let sessions = h.manager.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[1].id, older.id);

    let state = h.manager.snapshot().await;
    assert_eq!(state.active_session_id.as_deref(), Some(newer.id.as_str()));
    assert_eq!(state.messages.len(), 1);
}

#[tokio::test]
async fn test_create_session_goes_first_with_empty_messages() {
    let h = harness();
    let existing = h.store.create_session("u1", "existing").await.unwrap();
    h.store
        .save_message(NewMessage::user(&existing.id, "hi"))
        .await
        .unwrap();
    h.manager.list_sessions().await.unwrap();

    let created = h.manager.create_session().await.unwrap();
    assert_eq!(created.title, "New Conversation");

    let state = h.manager.snapshot().await;
    assert_eq!(state.sessions[0].id, created.id);
    assert_eq!(state.active_session_id.as_deref(), Some(created.id.as_str()));
    assert!(state.messages.is_empty());
}

#[tokio::test]
async fn test_select_loads_only_that_sessions_history() {
    let h = harness();
    let a = h.store.create_session("u1", "a").await.unwrap();
    let b = h.store.create_session("u1", "b").await.unwrap();
    for (session, text) in [(&a, "a1"), (&b, "b1"), (&a, "a2")] {
        h.store
            .save_message(NewMessage::user(&session.id, text))
            .await
            .unwrap();
    }

    h.manager.select_session(&a.id).await.unwrap();
    let state = h.manager.snapshot().await;
    let contents: Vec<&str> = state.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["a1", "a2"]);
    assert!(state.messages.iter().all(|m| m.is_confirmed()));
}

#[tokio::test]
async fn test_successful_turn_appends_two_confirmed_entries() {
    let h = harness();
    let session = h.manager.create_session().await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let outcome = h
        .manager
        .send_turn("  Can you help me prepare for an interview?  ")
        .await;
    assert_eq!(outcome, SendOutcome::Sent);

    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0].role, MessageRole::User);
    assert_eq!(
        state.messages[0].content,
        "Can you help me prepare for an interview?"
    );
    assert_eq!(state.messages[1].role, MessageRole::Assistant);
    assert_eq!(state.messages[1].content, templates::INTERVIEW_REPLY);
    assert!(state.messages.iter().all(|m| m.is_confirmed()));
    assert!(!state.sending);

    let touched = h.store.get_session(&session.id).await.unwrap().unwrap();
    assert!(touched.updated_at > session.updated_at);
    assert_eq!(state.sessions[0].updated_at, touched.updated_at);
}

#[tokio::test]
async fn test_blank_input_is_a_no_op() {
    let h = harness();
    h.manager.create_session().await.unwrap();
    let writes = h.faulty.writes();

    assert_eq!(h.manager.send_turn("   \n\t").await, SendOutcome::Empty);
    assert_eq!(h.faulty.writes(), writes);
    assert!(h.manager.snapshot().await.messages.is_empty());
}

#[tokio::test]
async fn test_send_without_session_is_a_no_op() {
    let h = harness();
    assert_eq!(h.manager.send_turn("hello").await, SendOutcome::NoSession);
    assert_eq!(h.faulty.writes(), 0);
}

#[tokio::test]
async fn test_assistant_failure_then_retry() {
    let mut h = harness();
    let session = h.manager.create_session().await.unwrap();
    drain(&mut h.events);
    h.faulty.fail(Fault::SaveAssistantMessage);

    assert_eq!(h.manager.send_turn("resume help").await, SendOutcome::Failed);

    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages[0].is_confirmed());
    assert!(state.messages[1].is_failed());
    let failed_id = state.messages[1].local_id;

    let events = drain(&mut h.events);
    assert!(events.iter().any(CoachEvent::is_error));

    h.faulty.heal(Fault::SaveAssistantMessage);
    assert_eq!(h.manager.retry(failed_id).await, SendOutcome::Sent);

    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages.iter().all(|m| m.is_confirmed()));

    let stored = h.store.get_messages(&session.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].content, templates::RESUME_REPLY);
}

#[tokio::test]
async fn test_responder_failure_then_retry_composes_reply() {
    let mut h = harness_with(Arc::new(FlakyResponder {
        failed_once: AtomicBool::new(false),
    }));
    let session = h.manager.create_session().await.unwrap();
    drain(&mut h.events);

    assert_eq!(
        h.manager.send_turn("How should I ask for a salary raise?").await,
        SendOutcome::Failed
    );
    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages[0].is_confirmed());
    assert_eq!(state.messages[1].role, MessageRole::Assistant);
    assert!(state.messages[1].is_failed());
    assert!(drain(&mut h.events).iter().any(CoachEvent::is_error));
    assert_eq!(h.store.get_messages(&session.id).await.unwrap().len(), 1);

    let reply_id = state.messages[1].local_id;
    assert_eq!(h.manager.retry(reply_id).await, SendOutcome::Sent);

    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages.iter().all(|m| m.is_confirmed()));
    assert_eq!(state.messages[1].content, templates::SALARY_REPLY);

    let stored = h.store.get_messages(&session.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].role, MessageRole::User);
    assert_eq!(stored[1].content, templates::SALARY_REPLY);
}

#[tokio::test]
async fn test_user_failure_then_retry_runs_whole_turn() {
    let h = harness();
    h.manager.create_session().await.unwrap();
    h.faulty.fail(Fault::SaveUserMessage);

    assert_eq!(h.manager.send_turn("hello").await, SendOutcome::Failed);
    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 1);
    assert!(matches!(state.messages[0].status, DeliveryStatus::Failed(_)));

    h.faulty.heal(Fault::SaveUserMessage);
    let local_id = state.messages[0].local_id;
    assert_eq!(h.manager.retry(local_id).await, SendOutcome::Sent);

    let state = h.manager.snapshot().await;
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].content, templates::FALLBACK_REPLY);
}

#[tokio::test]
async fn test_retry_of_confirmed_entry_does_nothing() {
    let h = harness();
    h.manager.create_session().await.unwrap();
    h.manager.send_turn("hello").await;
    let local_id = h.manager.snapshot().await.messages[0].local_id;
    let writes = h.faulty.writes();

    assert_eq!(h.manager.retry(local_id).await, SendOutcome::NothingToRetry);
    assert_eq!(h.manager.retry(9999).await, SendOutcome::NothingToRetry);
    assert_eq!(h.faulty.writes(), writes);
}

#[tokio::test]
async fn test_concurrent_send_is_rejected_without_writes() {
    let gate = Arc::new(Notify::new());
    let h = harness_with(Arc::new(GatedResponder { gate: gate.clone() }));
    h.manager.create_session().await.unwrap();
    let before = h.faulty.writes();

    let first = tokio::spawn({
        let manager = h.manager.clone();
        async move { manager.send_turn("hello").await }
    });
    // Wait until the user message is stored and the reply is held at the gate
    while h.faulty.writes() == before {
        tokio::task::yield_now().await;
    }
    assert!(h.manager.is_sending());
    let writes = h.faulty.writes();

    assert_eq!(h.manager.send_turn("second").await, SendOutcome::Busy);
    assert_eq!(h.faulty.writes(), writes);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), SendOutcome::Sent);
    assert_eq!(h.manager.snapshot().await.messages.len(), 2);
}

#[tokio::test]
async fn test_create_failure_emits_notice() {
    let mut h = harness();
    h.faulty.fail(Fault::CreateSession);

    assert!(h.manager.create_session().await.is_err());
    let events = drain(&mut h.events);
    assert_eq!(
        events,
        vec![CoachEvent::error("Failed to create new session")]
    );
}

#[tokio::test]
async fn test_delete_active_session_clears_view() {
    let h = harness();
    let session = h.manager.create_session().await.unwrap();
    h.manager.send_turn("goal setting").await;

    h.manager.delete_session(&session.id).await.unwrap();
    let state = h.manager.snapshot().await;
    assert!(state.active_session_id.is_none());
    assert!(state.messages.is_empty());
    assert!(h.store.get_messages(&session.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_updates_listed_title() {
    let h = harness();
    let session = h.manager.create_session().await.unwrap();

    let renamed = h
        .manager
        .rename_session(&session.id, "  Interview prep ")
        .await
        .unwrap();
    assert_eq!(renamed.title, "Interview prep");
    assert_eq!(h.manager.snapshot().await.sessions[0].title, "Interview prep");
    assert!(h.manager.rename_session(&session.id, " ").await.is_err());
}
