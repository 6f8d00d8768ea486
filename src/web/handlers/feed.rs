// GET /api/feed: the public feed.
//
// Approved confessions, newest first. Read-once confessions that haven't
// been revealed are sealed: their content and image are withheld until
// POST /api/confessions/{id}/reveal.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::confession::Confession;
use crate::web::{internal_error, AppState};

pub async fn get_feed(State(state): State<AppState>) -> Response {
    match state.service.feed().await {
        Ok(confessions) => {
            let entries: Vec<serde_json::Value> = confessions.iter().map(feed_entry).collect();
            Json(serde_json::json!({ "confessions": entries })).into_response()
        }
        Err(e) => internal_error(&e, "Store error loading feed"),
    }
}

/// Public view of a confession. Never includes the moderation reason.
pub fn feed_entry(c: &Confession) -> serde_json::Value {
    let sealed = c.is_read_once && !c.has_been_read;
    let comments: Vec<serde_json::Value> = c
        .comments
        .iter()
        .map(|comment| {
            serde_json::json!({
                "id": comment.id,
                "text": comment.text,
                "created_at": comment.created_at,
            })
        })
        .collect();

    serde_json::json!({
        "id": c.id,
        "sealed": sealed,
        "content": if sealed { None } else { Some(&c.content) },
        "image_url": if sealed { None } else { c.image_url.as_ref() },
        "tone": c.tone,
        "post_type": c.post_type,
        "created_at": c.created_at,
        "is_read_once": c.is_read_once,
        "comments_locked": c.comments_locked,
        "comments": comments,
        "upvotes": c.upvotes,
    })
}
