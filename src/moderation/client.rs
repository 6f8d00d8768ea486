// Fail-safe moderation client.
//
// Wraps any classifier with a timeout and maps every failure (transport,
// parse, unknown grade, timeout) to B2 "requires manual review". Content is
// never auto-published or auto-discarded because the classifier misbehaved.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::traits::{Grade, ModerationClassifier, ModerationError, ModerationResult};
use crate::output::truncate_chars;

/// Default bound on a single classifier call.
pub const DEFAULT_MODERATION_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct ModerationClient {
    classifier: Arc<dyn ModerationClassifier>,
    timeout: Duration,
}

impl ModerationClient {
    pub fn new(classifier: Arc<dyn ModerationClassifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Grade `text`. Never fails.
    pub async fn moderate(&self, text: &str) -> ModerationResult {
        match self.try_moderate(text).await {
            Ok(result) => {
                debug!(
                    grade = %result.grade,
                    reason = %result.reason,
                    text_preview = %truncate_chars(text, 50),
                    "Moderated text"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, "Moderation failed, routing to manual review");
                ModerationResult::manual_review(e.fail_safe_reason())
            }
        }
    }

    async fn try_moderate(&self, text: &str) -> Result<ModerationResult, ModerationError> {
        let raw = tokio::time::timeout(self.timeout, self.classifier.classify(text))
            .await
            .map_err(|_| ModerationError::Timeout(self.timeout))??;

        let grade: Grade = raw.grade.parse()?;
        Ok(ModerationResult {
            grade,
            reason: raw.reason,
        })
    }
}
