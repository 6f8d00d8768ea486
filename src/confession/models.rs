// Data models: the confession, its comments, and the admin settings.
//
// These are the types that flow through the application: the store keeps
// them, the service builds them, and the web layer serializes them. They
// carry no storage or HTTP dependencies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stylistic register a confession can be rewritten into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Caustic,
    Poetic,
    #[serde(rename = "Dark Humor")]
    DarkHumor,
    #[serde(rename = "Brutally Honest")]
    BrutallyHonest,
    Academic,
}

impl Tone {
    /// Every tone, in the order the submission form offers them.
    pub const ALL: [Tone; 5] = [
        Tone::Caustic,
        Tone::Poetic,
        Tone::DarkHumor,
        Tone::BrutallyHonest,
        Tone::Academic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Caustic => "Caustic",
            Tone::Poetic => "Poetic",
            Tone::DarkHumor => "Dark Humor",
            Tone::BrutallyHonest => "Brutally Honest",
            Tone::Academic => "Academic",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    /// Accepts the display name in any case, with spaces, dashes or
    /// underscores between words ("dark humor", "Dark-Humor", "dark_humor").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "caustic" => Ok(Tone::Caustic),
            "poetic" => Ok(Tone::Poetic),
            "darkhumor" => Ok(Tone::DarkHumor),
            "brutallyhonest" => Ok(Tone::BrutallyHonest),
            "academic" => Ok(Tone::Academic),
            _ => Err(format!(
                "unknown tone '{s}' (expected one of: {})",
                Tone::ALL.map(|t| t.as_str()).join(", ")
            )),
        }
    }
}

/// Whether a confession is free text or emoji only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Text,
    Emoji,
}

/// Moderation status of a confession.
///
/// `Rejected` exists so the grade mapping is total, but a rejected
/// submission is discarded before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfessionStatus {
    Pending,
    Approved,
    Flagged,
    Rejected,
}

impl ConfessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfessionStatus::Pending => "pending",
            ConfessionStatus::Approved => "approved",
            ConfessionStatus::Flagged => "flagged",
            ConfessionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ConfessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A comment on a confession. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A stored confession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confession {
    pub id: String,
    pub content: String,
    pub tone: Option<Tone>,
    pub post_type: PostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_read_once: bool,
    pub has_been_read: bool,
    pub comments_locked: bool,
    pub comments: Vec<Comment>,
    pub upvotes: u64,
    pub status: ConfessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_reason: Option<String>,
}

impl Confession {
    /// Build a fresh confession from a draft that passed moderation.
    pub fn from_draft(
        draft: ConfessionDraft,
        status: ConfessionStatus,
        moderation_reason: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: draft.content,
            tone: draft.tone,
            post_type: draft.post_type,
            image_url: draft.image_url,
            created_at,
            is_read_once: draft.is_read_once,
            has_been_read: false,
            comments_locked: draft.comments_locked,
            comments: Vec::new(),
            upvotes: 0,
            status,
            moderation_reason,
        }
    }

    /// Reconcile a replacement with the fields that must never regress.
    ///
    /// `id`, `created_at` and `is_read_once` are fixed at creation,
    /// `has_been_read` only moves false→true, and `upvotes` never decreases.
    pub fn with_invariants_of(mut self, previous: &Confession) -> Self {
        self.id = previous.id.clone();
        self.created_at = previous.created_at;
        self.is_read_once = previous.is_read_once;
        self.has_been_read |= previous.has_been_read;
        self.upvotes = self.upvotes.max(previous.upvotes);
        self
    }
}

/// The submitter-supplied part of a confession.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfessionDraft {
    pub content: String,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_read_once: bool,
    #[serde(default)]
    pub comments_locked: bool,
}

impl ConfessionDraft {
    /// Plain text draft with every option off.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Process-wide admin settings. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    pub retention_days: u32,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

/// Admin review tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminFilter {
    #[default]
    Pending,
    Flagged,
    All,
}

impl AdminFilter {
    pub fn matches(&self, confession: &Confession) -> bool {
        match self {
            AdminFilter::Pending => confession.status == ConfessionStatus::Pending,
            AdminFilter::Flagged => confession.status == ConfessionStatus::Flagged,
            AdminFilter::All => true,
        }
    }
}
