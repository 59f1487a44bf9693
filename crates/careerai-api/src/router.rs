use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, put},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    middleware::logging,
    openapi::ApiDoc,
    routes::{dashboard, goals, health, messages, profiles, sessions, skills},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Profiles
        .route(
            "/profiles/:user_id",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        // Goals
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goals/:goal_id",
            put(goals::update_goal).delete(goals::delete_goal),
        )
        .route("/goals/:goal_id/status", patch(goals::set_goal_status))
        // Skills
        .route("/skills", get(skills::list_skills).post(skills::add_skill))
        .route("/skills/:skill_id", axum::routing::delete(skills::delete_skill))
        // Sessions
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/sessions/:session_id",
            get(sessions::get_session)
                .patch(sessions::rename_session)
                .delete(sessions::delete_session),
        )
        // Messages
        .route(
            "/sessions/:session_id/messages",
            get(messages::list_messages).post(messages::send_message),
        );

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
