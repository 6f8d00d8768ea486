// Tone model trait: the fallible seam behind ToneRewriter.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::confession::Tone;

#[derive(Debug, Error)]
pub enum ToneError {
    #[error("tone model unavailable: {0}")]
    Unavailable(String),
    #[error("tone model timed out after {0:?}")]
    Timeout(Duration),
    #[error("tone model returned no text")]
    Empty,
}

/// Rewrites text into a tone. Implementations may fail; `ToneRewriter`
/// turns failures into a placeholder.
#[async_trait]
pub trait ToneModel: Send + Sync {
    async fn rewrite(&self, text: &str, tone: Tone) -> Result<String, ToneError>;
}

/// Tone model used when no API key is configured.
pub struct DisabledToneModel;

#[async_trait]
impl ToneModel for DisabledToneModel {
    async fn rewrite(&self, _text: &str, _tone: Tone) -> Result<String, ToneError> {
        Err(ToneError::Unavailable(
            "no tone model configured (set GEMINI_API_KEY)".to_string(),
        ))
    }
}
