// Per-confession public actions.
//
// POST /api/confessions                : submit (moderated before storing)
// POST /api/confessions/{id}/reveal    : open a read-once confession
// POST /api/confessions/{id}/upvote    : +1
// POST /api/confessions/{id}/comments  : append a comment unless locked

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::feed::feed_entry;
use crate::confession::{ConfessionDraft, ConfessionStatus};
use crate::service::{CommentError, SubmissionError};
use crate::web::{api_error, internal_error, AppState};

/// POST /api/confessions: moderate and store a draft.
///
/// 201 with the new id and status on success. A rejected submission gets a
/// generic 422 with no moderation detail.
pub async fn submit_confession(
    State(state): State<AppState>,
    Json(draft): Json<ConfessionDraft>,
) -> Response {
    match state.service.submit(draft).await {
        Ok(confession) => {
            let message = match confession.status {
                ConfessionStatus::Approved => "Your confession is live.",
                _ => "Your confession is awaiting review.",
            };
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "id": confession.id,
                    "status": confession.status,
                    "message": message,
                })),
            )
                .into_response()
        }
        Err(SubmissionError::Rejected) => api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Your submission could not be processed.",
        ),
        Err(e @ (SubmissionError::EmptyContent | SubmissionError::ContentTooLong { .. })) => {
            api_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(SubmissionError::Store(e)) => internal_error(&e, "Store error saving confession"),
    }
}

/// POST /api/confessions/{id}/reveal: mark as read and return the content.
/// Once read, a read-once confession is gone: later reveals, votes and
/// comments get 404.
pub async fn reveal(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.reveal(&id).await {
        Ok(Some(confession)) => Json(feed_entry(&confession)).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Confession not found"),
        Err(e) => internal_error(&e, "Store error revealing confession"),
    }
}

/// POST /api/confessions/{id}/upvote: returns the new count.
pub async fn upvote(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.upvote(&id).await {
        Ok(Some(upvotes)) => Json(serde_json::json!({ "upvotes": upvotes })).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Confession not found"),
        Err(e) => internal_error(&e, "Store error upvoting confession"),
    }
}

#[derive(Deserialize)]
pub struct CommentRequest {
    text: String,
}

/// POST /api/confessions/{id}/comments: 201 with the comment, 409 if locked.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommentRequest>,
) -> Response {
    match state.service.add_comment(&id, &body.text).await {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(CommentError::Empty) => api_error(StatusCode::BAD_REQUEST, "Comment is empty"),
        Err(CommentError::Locked) => {
            api_error(StatusCode::CONFLICT, "Comments are locked on this confession")
        }
        Err(CommentError::NotFound) => api_error(StatusCode::NOT_FOUND, "Confession not found"),
        Err(CommentError::Store(e)) => internal_error(&e, "Store error adding comment"),
    }
}
