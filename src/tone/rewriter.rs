// Tone rewriter: never fails, returns a visible placeholder instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::traits::{ToneError, ToneModel};
use crate::confession::Tone;

/// Default bound on a single rewrite call.
pub const DEFAULT_REWRITE_TIMEOUT: Duration = Duration::from_secs(20);

/// Text shown in place of a rewrite that failed.
pub fn error_placeholder(tone: Tone) -> String {
    format!("Error applying tone: {tone}. Please try again.")
}

#[derive(Clone)]
pub struct ToneRewriter {
    model: Arc<dyn ToneModel>,
    timeout: Duration,
}

impl ToneRewriter {
    pub fn new(model: Arc<dyn ToneModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Rewrite `original` into `tone`, trimmed. On any failure the caller
    /// gets `error_placeholder(tone)` and can display it as-is.
    pub async fn rewrite(&self, original: &str, tone: Tone) -> String {
        match self.try_rewrite(original, tone).await {
            Ok(text) => {
                debug!(tone = %tone, chars = text.chars().count(), "Rewrote text");
                text
            }
            Err(e) => {
                warn!(error = %e, tone = %tone, "Tone rewrite failed");
                error_placeholder(tone)
            }
        }
    }

    async fn try_rewrite(&self, original: &str, tone: Tone) -> Result<String, ToneError> {
        let text = tokio::time::timeout(self.timeout, self.model.rewrite(original, tone))
            .await
            .map_err(|_| ToneError::Timeout(self.timeout))??;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ToneError::Empty);
        }
        Ok(trimmed.to_string())
    }
}
