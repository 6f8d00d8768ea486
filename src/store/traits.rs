// ConfessionStore trait: backend-agnostic async interface for the collection.
//
// Implementors: MemoryStore (the only backend; data lives for the process
// lifetime). Methods are async so a persistent backend can slot in behind
// `Arc<dyn ConfessionStore>` without touching callers.
//
// Every operation is total: a missing id is a no-op reported through the
// return value, never an error. `Result` is reserved for backend failures.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::confession::Confession;

/// Replacement function for `update`. Receives the current entry by value.
pub type UpdateFn = Box<dyn FnOnce(Confession) -> Confession + Send>;

/// Read-only predicate for `filter`.
pub type Predicate<'a> = &'a (dyn Fn(&Confession) -> bool + Send + Sync);

#[async_trait]
pub trait ConfessionStore: Send + Sync {
    /// Add a confession at the front (newest first).
    async fn insert(&self, confession: Confession) -> Result<()>;

    /// Replace the entry with `id` by `apply(current)`. Fixed fields are
    /// reconciled with `Confession::with_invariants_of`. Returns the stored
    /// result, or `None` if no entry has that id.
    async fn update(&self, id: &str, apply: UpdateFn) -> Result<Option<Confession>>;

    /// Remove the entry with `id`. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Remove every confession that is expired at `now`. Returns the count.
    async fn sweep_expired(&self, retention_days: u32, now: DateTime<Utc>) -> Result<usize>;

    /// Entries matching `predicate`, in store order.
    async fn filter(&self, predicate: Predicate<'_>) -> Result<Vec<Confession>>;

    /// Single entry by id.
    async fn get(&self, id: &str) -> Result<Option<Confession>>;

    /// Number of stored confessions.
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
