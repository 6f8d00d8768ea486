// POST /api/tone: rewrite draft text into a tone before submitting.
//
// Always 200 once the request is valid: a failed rewrite comes back as the
// placeholder text, which the form can show as-is.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::confession::Tone;
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct ToneRequest {
    text: String,
    tone: Tone,
}

pub async fn rewrite(State(state): State<AppState>, Json(body): Json<ToneRequest>) -> Response {
    if body.text.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Nothing to rewrite");
    }
    let text = state.service.rewrite_tone(&body.text, body.tone).await;
    Json(serde_json::json!({ "tone": body.tone, "text": text })).into_response()
}
