use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;

use careerai_api::{build_router, AppState, Config};
use careerai_coach::{templates, KeywordResponder, Responder};
use careerai_persist::{Fault, FaultyPersistenceClient, InMemoryPersistenceClient};

fn app_with(responder: Arc<dyn Responder>) -> (Router, Arc<FaultyPersistenceClient>) {
    let store = Arc::new(FaultyPersistenceClient::new(Arc::new(
        InMemoryPersistenceClient::new(),
    )));
    let state = Arc::new(AppState::new(Config::default(), store.clone(), responder));
    (build_router(state), store)
}

fn app() -> (Router, Arc<FaultyPersistenceClient>) {
    app_with(Arc::new(KeywordResponder::new()))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_session(app: &Router, user_id: &str) -> String {
    let (status, body) = call(app, "POST", "/sessions", Some(json!({ "user_id": user_id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

struct GatedResponder {
    gate: Arc<Notify>,
}

#[async_trait]
impl Responder for GatedResponder {
    async fn respond(&self, prompt: &str) -> anyhow::Result<String> {
        self.gate.notified().await;
        Ok(KeywordResponder::reply(prompt).to_string())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let (app, store) = app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["store"], "connected");
    assert_eq!(body["services"]["responder"], "keyword");

    store.fail(Fault::Ping);
    let (_, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/sessions/{session_id}/messages"].is_object());
}

#[tokio::test]
async fn test_send_turn_returns_both_messages() {
    let (app, _) = app();
    let session_id = create_session(&app, "u1").await;

    let uri = format!("/sessions/{session_id}/messages");
    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(json!({ "content": "  Can you help me prepare for an interview?  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["user_message"]["content"],
        "Can you help me prepare for an interview?"
    );
    assert_eq!(body["user_message"]["role"], "user");
    assert_eq!(body["assistant_message"]["role"], "assistant");
    assert_eq!(body["assistant_message"]["content"], templates::INTERVIEW_REPLY);

    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");
}

#[tokio::test]
async fn test_blank_message_is_rejected_without_writes() {
    let (app, store) = app();
    let session_id = create_session(&app, "u1").await;
    let writes = store.writes();

    let uri = format!("/sessions/{session_id}/messages");
    let (status, body) = call(&app, "POST", &uri, Some(json!({ "content": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(store.writes(), writes);
}

#[tokio::test]
async fn test_send_to_unknown_session_is_not_found() {
    let (app, _) = app();
    let (status, _) = call(
        &app,
        "POST",
        "/sessions/missing/messages",
        Some(json!({ "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", "/sessions/missing/messages", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let (app, store) = app();
    let session_id = create_session(&app, "u1").await;
    store.fail(Fault::SaveAssistantMessage);

    let uri = format!("/sessions/{session_id}/messages");
    let (status, body) = call(&app, "POST", &uri, Some(json!({ "content": "salary" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send message");
}

#[tokio::test]
async fn test_concurrent_send_to_same_session_conflicts() {
    let gate = Arc::new(Notify::new());
    let (app, store) = app_with(Arc::new(GatedResponder { gate: gate.clone() }));
    let session_id = create_session(&app, "u1").await;
    let uri = format!("/sessions/{session_id}/messages");
    let before = store.writes();

    let first = tokio::spawn({
        let app = app.clone();
        let uri = uri.clone();
        async move { call(&app, "POST", &uri, Some(json!({ "content": "first" }))).await }
    });
    // Wait until the first turn has stored its user message and is held at the gate
    while store.writes() == before {
        tokio::task::yield_now().await;
    }

    let (status, _) = call(&app, "POST", &uri, Some(json!({ "content": "second" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    gate.notify_one();
    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (app, _) = app();
    let older = create_session(&app, "u1").await;
    let newer = create_session(&app, "u1").await;
    create_session(&app, "u2").await;

    let (_, body) = call(&app, "GET", "/sessions?user_id=u1", None).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![newer.as_str(), older.as_str()]);

    // A completed turn moves the older session to the front
    let uri = format!("/sessions/{older}/messages");
    call(&app, "POST", &uri, Some(json!({ "content": "hi" }))).await;
    let (_, body) = call(&app, "GET", "/sessions?user_id=u1", None).await;
    assert_eq!(body[0]["id"], older.as_str());

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/sessions/{older}"),
        Some(json!({ "title": "Salary talk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Salary talk");

    let (status, _) = call(&app, "DELETE", &format!("/sessions/{older}?user_id=u2"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", &format!("/sessions/{older}?user_id=u1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", &format!("/sessions/{older}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_session_uses_default_title() {
    let (app, _) = app();
    let (_, body) = call(&app, "POST", "/sessions", Some(json!({ "user_id": "u1" }))).await;
    assert_eq!(body["title"], "New Conversation");
}

#[tokio::test]
async fn test_goal_crud_and_dashboard() {
    let (app, _) = app();

    let (status, goal) = call(
        &app,
        "POST",
        "/goals",
        Some(json!({
            "user_id": "u1",
            "title": "Become a staff engineer",
            "target_date": "2027-06-30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["status"], "pending");
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let (status, goal) = call(
        &app,
        "PATCH",
        &format!("/goals/{goal_id}/status"),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["status"], "in_progress");

    let (status, goal) = call(
        &app,
        "PUT",
        &format!("/goals/{goal_id}"),
        Some(json!({ "description": "Lead a cross-team project", "target_date": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["title"], "Become a staff engineer");
    assert!(goal["target_date"].is_null());

    call(
        &app,
        "POST",
        "/goals",
        Some(json!({ "user_id": "u1", "title": "Mentor juniors", "status": "completed" })),
    )
    .await;
    call(
        &app,
        "POST",
        "/skills",
        Some(json!({ "user_id": "u1", "name": "Rust", "proficiency": "advanced" })),
    )
    .await;

    let (status, summary) = call(&app, "GET", "/dashboard?user_id=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_goals"], 2);
    assert_eq!(summary["completed_goals"], 1);
    assert_eq!(summary["in_progress_goals"], 1);
    assert_eq!(summary["skills_count"], 1);

    let (status, _) = call(&app, "DELETE", &format!("/goals/{goal_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "DELETE", &format!("/goals/{goal_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_goal_title_is_bad_request() {
    let (app, _) = app();
    let (status, _) = call(
        &app,
        "POST",
        "/goals",
        Some(json!({ "user_id": "u1", "title": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_skills_listing_and_validation() {
    let (app, _) = app();
    for name in ["SQL", "  Kubernetes  ", "Public speaking"] {
        let (status, _) = call(
            &app,
            "POST",
            "/skills",
            Some(json!({ "user_id": "u1", "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/skills?user_id=u1&limit=2", None).await;
    let skills = body.as_array().unwrap();
    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0]["name"], "Public speaking");
    assert_eq!(skills[1]["name"], "Kubernetes");
    assert_eq!(skills[1]["proficiency"], "intermediate");

    let (status, _) = call(
        &app,
        "POST",
        "/skills",
        Some(json!({ "user_id": "u1", "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let skill_id = skills[0]["id"].as_str().unwrap();
    let (status, _) = call(&app, "DELETE", &format!("/skills/{skill_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_profile_upsert_and_get() {
    let (app, _) = app();
    let (status, _) = call(&app, "GET", "/profiles/u1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, profile) = call(
        &app,
        "PUT",
        "/profiles/u1",
        Some(json!({ "full_name": "Ada Lovelace", "experience_years": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["full_name"], "Ada Lovelace");

    let (status, profile) = call(&app, "GET", "/profiles/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["experience_years"], 5);
}
