// Web server: Axum JSON API over the confession service.
//
// Public routes serve the feed and per-post actions; /api/admin/* routes
// expose the review queue and settings. There is no login: access control
// belongs to whatever sits in front of this server.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::retention::SweepStatus;
use crate::service::ConfessionService;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConfessionService>,
    pub sweep_status: Arc<RwLock<SweepStatus>>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("WhisperVault listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/health", get(health))
        .route("/api/feed", get(handlers::feed::get_feed))
        .route(
            "/api/confessions",
            post(handlers::confessions::submit_confession),
        )
        .route(
            "/api/confessions/{id}/reveal",
            post(handlers::confessions::reveal),
        )
        .route(
            "/api/confessions/{id}/upvote",
            post(handlers::confessions::upvote),
        )
        .route(
            "/api/confessions/{id}/comments",
            post(handlers::confessions::add_comment),
        )
        .route("/api/tone", post(handlers::tone::rewrite));

    let admin_api = Router::new()
        .route(
            "/api/admin/confessions",
            get(handlers::admin::list_confessions),
        )
        .route(
            "/api/admin/confessions/{id}/approve",
            post(handlers::admin::approve),
        )
        .route(
            "/api/admin/confessions/{id}",
            axum::routing::delete(handlers::admin::delete),
        )
        .route(
            "/api/admin/settings",
            get(handlers::admin::get_settings).put(handlers::admin::put_settings),
        )
        .route("/api/admin/status", get(handlers::admin::get_status));

    Router::new()
        .merge(public_api)
        .merge(admin_api)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// 500 with the error logged, never echoed to the client.
pub fn internal_error(e: &anyhow::Error, context: &str) -> Response {
    tracing::error!(error = %e, "{context}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}
