// Moderation classifier trait: the swap-ready abstraction.
//
// A classifier is allowed to fail; `ModerationClient` is the layer that
// turns every failure into the fail-safe B2 grade. Keeping the two apart
// means the fallible part can be faked in tests without any network.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confession::policy::classify_grade;
use crate::confession::ConfessionStatus;

/// Risk tier assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Benign, safe for public display.
    A1,
    /// Needs human confirmation.
    B2,
    /// High-risk, flag for admin review.
    C4,
    /// Clearly violates policy, never posted.
    X,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A1 => "A1",
            Grade::B2 => "B2",
            Grade::C4 => "C4",
            Grade::X => "X",
        }
    }

    /// Status a confession with this grade starts in.
    pub fn status(&self) -> ConfessionStatus {
        classify_grade(self.as_str())
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ModerationError;

    /// Exact match only. Anything else, padded or lowercase included, is
    /// an invalid grade and takes the fail-safe path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A1" => Ok(Grade::A1),
            "B2" => Ok(Grade::B2),
            "C4" => Ok(Grade::C4),
            "X" => Ok(Grade::X),
            other => Err(ModerationError::InvalidGrade(other.to_string())),
        }
    }
}

/// The verdict the rest of the system sees. Always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub grade: Grade,
    pub reason: String,
}

impl ModerationResult {
    /// The fail-safe verdict: send it to a human.
    pub fn manual_review(reason: impl Into<String>) -> Self {
        Self {
            grade: Grade::B2,
            reason: reason.into(),
        }
    }
}

/// The verdict exactly as the classifier returned it, grade unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawVerdict {
    pub grade: String,
    pub reason: String,
}

/// Why a classifier call produced no usable verdict.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed classifier response: {0}")]
    Malformed(String),
    #[error("classifier returned unknown grade {0:?}")]
    InvalidGrade(String),
}

impl ModerationError {
    /// Reason stored on a confession that fell back to manual review.
    pub fn fail_safe_reason(&self) -> &'static str {
        match self {
            ModerationError::Unavailable(_) => "AI moderation unavailable, requires manual review.",
            ModerationError::Timeout(_) => "AI moderation timed out, requires manual review.",
            ModerationError::Malformed(_) => {
                "AI moderation returned an unreadable answer, requires manual review."
            }
            ModerationError::InvalidGrade(_) => {
                "AI returned an invalid grade, requires manual review."
            }
        }
    }
}

/// Trait for grading text. Implementations are async because the real one
/// is an HTTP call.
#[async_trait]
pub trait ModerationClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<RawVerdict, ModerationError>;
}

/// Classifier used when no API key is configured. Every call fails, so every
/// submission lands in the manual review queue instead of auto-publishing.
pub struct DisabledClassifier;

#[async_trait]
impl ModerationClassifier for DisabledClassifier {
    async fn classify(&self, _text: &str) -> Result<RawVerdict, ModerationError> {
        Err(ModerationError::Unavailable(
            "no moderation backend configured (set GEMINI_API_KEY)".to_string(),
        ))
    }
}
