// Admin review handlers.
//
// GET    /api/admin/confessions?filter= : pending (default) | flagged | all
// POST   /api/admin/confessions/{id}/approve
// DELETE /api/admin/confessions/{id}
// GET    /api/admin/settings
// PUT    /api/admin/settings            : { retention_days }, sweeps at once
// GET    /api/admin/status              : status counts + last sweep
//
// These bypass moderation entirely.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::confession::{AdminFilter, AdminSettings, ConfessionStatus};
use crate::service::SettingsError;
use crate::web::{api_error, internal_error, AppState};

#[derive(Deserialize, Default)]
pub struct QueueQuery {
    pub filter: Option<AdminFilter>,
}

/// GET /api/admin/confessions: full confessions, moderation reason included.
pub async fn list_confessions(
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> Response {
    let filter = params.filter.unwrap_or_default();
    match state.service.admin_queue(filter).await {
        Ok(confessions) => Json(serde_json::json!({
            "filter": filter,
            "total": confessions.len(),
            "confessions": confessions,
        }))
        .into_response(),
        Err(e) => internal_error(&e, "Store error loading admin queue"),
    }
}

pub async fn approve(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.approve(&id).await {
        Ok(Some(confession)) => Json(confession).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Confession not found"),
        Err(e) => internal_error(&e, "Store error approving confession"),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => api_error(StatusCode::NOT_FOUND, "Confession not found"),
        Err(e) => internal_error(&e, "Store error deleting confession"),
    }
}

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.settings().await)
}

/// PUT /api/admin/settings: 400 unless retention_days ≥ 1.
pub async fn put_settings(
    State(state): State<AppState>,
    Json(body): Json<AdminSettings>,
) -> Response {
    match state.service.set_retention_days(body.retention_days).await {
        Ok(swept) => Json(serde_json::json!({
            "retention_days": body.retention_days,
            "swept": swept,
        }))
        .into_response(),
        Err(e @ SettingsError::NonPositiveRetention) => {
            api_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(SettingsError::Store(e)) => internal_error(&e, "Store error applying retention"),
    }
}

/// GET /api/admin/status: counts per status plus the sweeper's last run.
pub async fn get_status(State(state): State<AppState>) -> Response {
    let all = match state.service.admin_queue(AdminFilter::All).await {
        Ok(all) => all,
        Err(e) => return internal_error(&e, "Store error loading status"),
    };

    let mut approved = 0u32;
    let mut pending = 0u32;
    let mut flagged = 0u32;
    for confession in &all {
        match confession.status {
            ConfessionStatus::Approved => approved += 1,
            ConfessionStatus::Pending => pending += 1,
            ConfessionStatus::Flagged => flagged += 1,
            ConfessionStatus::Rejected => {}
        }
    }

    let settings = state.service.settings().await;
    let sweep = state.sweep_status.read().await.clone();

    Json(serde_json::json!({
        "retention_days": settings.retention_days,
        "status_counts": {
            "approved": approved,
            "pending": pending,
            "flagged": flagged,
            "total": all.len(),
        },
        "sweep": sweep,
    }))
    .into_response()
}
