// Gemini generateContent client: the one upstream both AI features talk to.
//
// A thin reqwest wrapper: one POST per call, system instruction + single user
// turn in, first candidate's text out. Moderation asks for a JSON response
// against a schema; tone rewriting asks for free text.
//
// API docs: https://ai.google.dev/api/generate-content

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::rate_limiter::RateLimiter;

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for both moderation and rewriting.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Everything that can go wrong talking to Gemini.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Gemini response contained no text")]
    EmptyResponse,
}

/// Per-request sampling and output settings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        rate_limiter: RateLimiter,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::Client::builder()
            .user_agent("whispervault/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            rate_limiter,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one single-turn generation and return the first candidate's text.
    pub async fn generate(
        &self,
        system_instruction: &str,
        user_text: &str,
        config: GenerationConfig,
    ) -> Result<String, GeminiError> {
        self.rate_limiter.acquire().await;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user_text.to_string(),
                }],
            }],
            generation_config: config,
        };

        debug!(model = %self.model, chars = user_text.chars().count(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        first_candidate_text(parsed).ok_or(GeminiError::EmptyResponse)
    }
}

/// Concatenate the text parts of the first candidate.
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// --- generateContent request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
