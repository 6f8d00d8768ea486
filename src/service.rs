// ConfessionService: submission pipeline and every per-post / admin action.
//
// Submission: sanitize → validate → moderate (awaited, bounded) → classify →
// insert or discard. The store is only touched after the external call has
// finished, so no partial writes interleave with moderation.
//
// Admin actions go straight to the store and never re-run moderation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::clock::Clock;
use crate::confession::emoji::retain_emoji;
use crate::confession::policy::{classify_grade, is_visible_in_feed};
use crate::confession::{
    AdminFilter, AdminSettings, Comment, Confession, ConfessionDraft, ConfessionStatus, PostType,
    Tone,
};
use crate::moderation::ModerationClient;
use crate::store::ConfessionStore;
use crate::tone::ToneRewriter;

/// Default cap on confession length, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 1000;

/// Why a submission produced no confession.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("confession is empty")]
    EmptyContent,
    #[error("confession is longer than {max} characters")]
    ContentTooLong { max: usize },
    /// Grade X. Deliberately carries no detail.
    #[error("your submission could not be processed")]
    Rejected,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("comment is empty")]
    Empty,
    #[error("comments are locked on this confession")]
    Locked,
    #[error("no such confession")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("retention must be at least one day")]
    NonPositiveRetention,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct ConfessionService {
    store: Arc<dyn ConfessionStore>,
    moderation: ModerationClient,
    tone: ToneRewriter,
    clock: Arc<dyn Clock>,
    settings: RwLock<AdminSettings>,
    max_content_chars: usize,
}

impl ConfessionService {
    pub fn new(
        store: Arc<dyn ConfessionStore>,
        moderation: ModerationClient,
        tone: ToneRewriter,
        clock: Arc<dyn Clock>,
        settings: AdminSettings,
    ) -> Self {
        Self {
            store,
            moderation,
            tone,
            clock,
            settings: RwLock::new(settings),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }

    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    pub fn store(&self) -> &Arc<dyn ConfessionStore> {
        &self.store
    }

    // --- Submission ---

    /// Moderate and store a new confession. Returns the stored confession,
    /// whatever status moderation gave it.
    pub async fn submit(&self, mut draft: ConfessionDraft) -> Result<Confession, SubmissionError> {
        if draft.post_type == PostType::Emoji {
            draft.content = retain_emoji(&draft.content);
        }
        if draft.content.trim().is_empty() {
            return Err(SubmissionError::EmptyContent);
        }
        if draft.content.chars().count() > self.max_content_chars {
            return Err(SubmissionError::ContentTooLong {
                max: self.max_content_chars,
            });
        }

        let verdict = self.moderation.moderate(&draft.content).await;
        let status = classify_grade(verdict.grade.as_str());

        if status == ConfessionStatus::Rejected {
            info!(grade = %verdict.grade, "Submission rejected by moderation");
            return Err(SubmissionError::Rejected);
        }

        let confession =
            Confession::from_draft(draft, status, Some(verdict.reason), self.clock.now());
        self.store.insert(confession.clone()).await?;

        info!(id = %confession.id, status = %confession.status, "Confession stored");
        Ok(confession)
    }

    pub async fn rewrite_tone(&self, text: &str, tone: Tone) -> String {
        self.tone.rewrite(text, tone).await
    }

    // --- Public feed ---

    /// Approved confessions that are still visible, newest first.
    pub async fn feed(&self) -> Result<Vec<Confession>> {
        self.store.filter(&is_visible_in_feed).await
    }

    /// Apply `change` only if the confession is currently visible in the
    /// feed. Visibility is checked inside the store update, under the same
    /// lock as the write, so a read-once confession opens exactly once.
    ///
    /// Anything not visible (under review, or read-once and already read)
    /// behaves as if it didn't exist.
    async fn update_visible<F>(&self, id: &str, change: F) -> Result<Option<Confession>>
    where
        F: FnOnce(Confession) -> Confession + Send + 'static,
    {
        let applied = Arc::new(AtomicBool::new(false));
        let flag = applied.clone();
        let updated = self
            .store
            .update(
                id,
                Box::new(move |c: Confession| {
                    if is_visible_in_feed(&c) {
                        flag.store(true, Ordering::SeqCst);
                        change(c)
                    } else {
                        c
                    }
                }),
            )
            .await?;
        Ok(updated.filter(|_| applied.load(Ordering::SeqCst)))
    }

    /// Mark a confession as read and return it. Only ever sets the flag.
    /// A read-once confession that was already read is gone.
    pub async fn reveal(&self, id: &str) -> Result<Option<Confession>> {
        self.update_visible(id, |mut c: Confession| {
            c.has_been_read = true;
            c
        })
        .await
    }

    /// Add one upvote. Returns the new count.
    pub async fn upvote(&self, id: &str) -> Result<Option<u64>> {
        let updated = self
            .update_visible(id, |mut c: Confession| {
                c.upvotes = c.upvotes.saturating_add(1);
                c
            })
            .await?;
        Ok(updated.map(|c| c.upvotes))
    }

    /// Append a comment. Locked confessions refuse new comments.
    pub async fn add_comment(&self, id: &str, text: &str) -> Result<Comment, CommentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentError::Empty);
        }

        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            created_at: self.clock.now(),
        };
        let appended = comment.clone();
        let updated = self
            .update_visible(id, move |mut c: Confession| {
                if !c.comments_locked {
                    c.comments.push(appended);
                }
                c
            })
            .await?
            .ok_or(CommentError::NotFound)?;

        if !updated.comments.iter().any(|c| c.id == comment.id) {
            return Err(CommentError::Locked);
        }
        Ok(comment)
    }

    // --- Admin ---

    pub async fn admin_queue(&self, filter: AdminFilter) -> Result<Vec<Confession>> {
        self.store.filter(&move |c: &Confession| filter.matches(c)).await
    }

    pub async fn approve(&self, id: &str) -> Result<Option<Confession>> {
        let updated = self
            .store
            .update(
                id,
                Box::new(|mut c: Confession| {
                    c.status = ConfessionStatus::Approved;
                    c
                }),
            )
            .await?;
        if updated.is_some() {
            info!(id, "Confession approved");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        if removed {
            info!(id, "Confession deleted");
        }
        Ok(removed)
    }

    pub async fn settings(&self) -> AdminSettings {
        *self.settings.read().await
    }

    /// Change retention and apply it immediately. Returns the number of
    /// confessions the new value swept.
    pub async fn set_retention_days(&self, days: u32) -> Result<usize, SettingsError> {
        if days == 0 {
            return Err(SettingsError::NonPositiveRetention);
        }
        self.settings.write().await.retention_days = days;
        info!(retention_days = days, "Retention updated");
        Ok(self.sweep_expired().await?)
    }

    /// Remove everything older than the current retention, as of now.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let retention_days = self.settings().await.retention_days;
        let now = self.clock.now();
        let removed = self.store.sweep_expired(retention_days, now).await?;
        if removed > 0 {
            info!(removed, retention_days, "Retention sweep removed confessions");
        }
        Ok(removed)
    }
}
