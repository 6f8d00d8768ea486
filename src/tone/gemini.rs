// Gemini-backed tone model.

use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{ToneError, ToneModel};
use crate::confession::Tone;
use crate::gemini::{GeminiClient, GeminiError, GenerationConfig};

pub struct GeminiToneModel {
    client: Arc<GeminiClient>,
}

impl GeminiToneModel {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

fn system_instruction(tone: Tone) -> String {
    format!(
        "You are a creative writing assistant. Rewrite the following confession to match \
         the tone of '{tone}' while preserving its original meaning and anonymous feel. \
         Do not add any new information. Output only the rewritten text."
    )
}

impl From<GeminiError> for ToneError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::EmptyResponse => ToneError::Empty,
            other => ToneError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl ToneModel for GeminiToneModel {
    async fn rewrite(&self, text: &str, tone: Tone) -> Result<String, ToneError> {
        let config = GenerationConfig {
            temperature: Some(0.8),
            top_p: Some(0.9),
            ..Default::default()
        };
        let answer = self
            .client
            .generate(&system_instruction(tone), text, config)
            .await?;
        Ok(answer.trim().to_string())
    }
}
