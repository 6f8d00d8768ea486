// MemoryStore: in-process ConfessionStore backend.
//
// The collection is a Vec behind a tokio RwLock: front is newest. Writers
// hold the lock only for the synchronous mutation, never across an await
// on anything else, so store mutations are serialized without blocking the
// external calls that precede them.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{ConfessionStore, Predicate, UpdateFn};
use crate::confession::policy::is_expired;
use crate::confession::{Confession, ConfessionStatus};

#[derive(Default)]
pub struct MemoryStore {
    confessions: RwLock<Vec<Confession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a given collection, kept in the order supplied.
    /// Rejected entries are dropped since they may never be stored.
    pub fn with_confessions(confessions: Vec<Confession>) -> Self {
        let confessions = confessions
            .into_iter()
            .filter(|c| c.status != ConfessionStatus::Rejected)
            .collect();
        Self {
            confessions: RwLock::new(confessions),
        }
    }
}

#[async_trait]
impl ConfessionStore for MemoryStore {
    async fn insert(&self, confession: Confession) -> Result<()> {
        if confession.status == ConfessionStatus::Rejected {
            anyhow::bail!("refusing to store rejected confession {}", confession.id);
        }
        let mut confessions = self.confessions.write().await;
        confessions.insert(0, confession);
        Ok(())
    }

    async fn update(&self, id: &str, apply: UpdateFn) -> Result<Option<Confession>> {
        let mut confessions = self.confessions.write().await;
        let Some(slot) = confessions.iter_mut().find(|c| c.id == id) else {
            debug!(id, "Update skipped, no such confession");
            return Ok(None);
        };

        let mut next = apply(slot.clone()).with_invariants_of(slot);
        // Rejected is unreachable once stored
        if next.status == ConfessionStatus::Rejected {
            next.status = slot.status;
        }
        *slot = next.clone();
        Ok(Some(next))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut confessions = self.confessions.write().await;
        let before = confessions.len();
        confessions.retain(|c| c.id != id);
        Ok(confessions.len() < before)
    }

    async fn sweep_expired(&self, retention_days: u32, now: DateTime<Utc>) -> Result<usize> {
        let mut confessions = self.confessions.write().await;
        let before = confessions.len();
        confessions.retain(|c| !is_expired(c, retention_days, now));
        Ok(before - confessions.len())
    }

    async fn filter(&self, predicate: Predicate<'_>) -> Result<Vec<Confession>> {
        let confessions = self.confessions.read().await;
        Ok(confessions.iter().filter(|&c| predicate(c)).cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Confession>> {
        let confessions = self.confessions.read().await;
        Ok(confessions.iter().find(|c| c.id == id).cloned())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.confessions.read().await.len())
    }
}
