// Gemini-backed moderation classifier.
//
// Requests a schema-constrained JSON answer `{grade, reason}`. The grade is
// returned as-is; validating it against A1/B2/C4/X is the client's job.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::traits::{ModerationClassifier, ModerationError, RawVerdict};
use crate::gemini::{GeminiClient, GeminiError, GenerationConfig};

const SYSTEM_INSTRUCTION: &str = "You are a content moderation AI for an anonymous \
confessions platform. Analyze the following text for risk on a scale of A1 (Benign) to C4 \
(High-Risk) or X (Reject). Categories to check for: Hate Speech, Self-Harm, Personally \
Identifiable Information (PII), Harassment, Threats. Respond in the specified JSON format.
- A1: Benign, safe for public display.
- B2: Requires human confirmation. Could be sensitive or borderline.
- C4: High-risk. Flag for immediate admin review.
- X: Reject. Clearly violates policy, should not be posted.";

pub struct GeminiClassifier {
    client: Arc<GeminiClient>,
}

impl GeminiClassifier {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "grade": {
                "type": "STRING",
                "description": "The moderation grade (A1, B2, C4, X)."
            },
            "reason": {
                "type": "STRING",
                "description": "A brief reason for the assigned grade."
            }
        },
        "required": ["grade", "reason"]
    })
}

/// Parse the model's JSON answer.
pub fn parse_verdict(text: &str) -> Result<RawVerdict, ModerationError> {
    serde_json::from_str(text.trim()).map_err(|e| ModerationError::Malformed(e.to_string()))
}

impl From<GeminiError> for ModerationError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::EmptyResponse => ModerationError::Malformed(e.to_string()),
            GeminiError::Transport(ref inner) if inner.is_decode() => {
                ModerationError::Malformed(e.to_string())
            }
            other => ModerationError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl ModerationClassifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> Result<RawVerdict, ModerationError> {
        let config = GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
            ..Default::default()
        };
        let answer = self
            .client
            .generate(SYSTEM_INSTRUCTION, text, config)
            .await?;
        parse_verdict(&answer)
    }
}
