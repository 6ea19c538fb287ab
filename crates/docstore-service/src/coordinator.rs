//! Consistency coordinator
//!
//! The backing store indexes writes asynchronously: a write the store
//! has accepted is not guaranteed to be visible to the next read or
//! search. This layer decides, per operation, how that gap is bridged:
//!
//! - **create** never re-reads: the response is assembled from the
//!   caller's fields plus the store-assigned id, which are authoritative.
//! - **update** must return the post-update document, so it performs a
//!   bounded re-read with backoff until the returned fields reflect the
//!   patch, and reports a visibility timeout when the budget runs out —
//!   stale fields are never returned as success.
//! - **delete** is terminal once acknowledged; its disappearance from
//!   reads and searches is eventual, not immediate.
//! - **search** is a pass-through: it eventually reflects all prior
//!   writes, with no ordering guarantee against concurrent writes.
//!
//! Retries are confined to the visibility re-read. Write operations are
//! never retried here: without idempotency keys a replayed create or
//! update risks duplicate writes.

use docstore_common::{Document, DocumentFields, DocumentPatch, Error, Result, StoreConfig};
use docstore_index::{DeleteOutcome, DocumentIndex, UpdateOutcome};
use std::time::Duration;
use tracing::{debug, warn};

/// Budget for the post-update re-read
#[derive(Clone, Copy, Debug)]
pub struct VisibilityPolicy {
    /// Read attempts before giving up
    pub attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl VisibilityPolicy {
    #[must_use]
    pub const fn new(attempts: u32, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

impl From<&StoreConfig> for VisibilityPolicy {
    fn from(config: &StoreConfig) -> Self {
        Self::new(
            config.visibility_attempts,
            Duration::from_millis(config.visibility_backoff_ms),
        )
    }
}

/// Bridges lifecycle operations onto the store adapter, enforcing the
/// visibility contract above. Holds no per-document state: concurrent
/// updates to the same id are not serialized here and resolve to
/// whatever the store's native conflict handling produces.
pub struct Coordinator<I> {
    index: I,
    policy: VisibilityPolicy,
}

impl<I: DocumentIndex> Coordinator<I> {
    pub const fn new(index: I, policy: VisibilityPolicy) -> Self {
        Self { index, policy }
    }

    /// The underlying store adapter
    pub const fn index(&self) -> &I {
        &self.index
    }

    /// Index a new document. The created document is assembled from the
    /// caller's fields and the assigned id; no re-read is needed.
    pub async fn create(&self, fields: DocumentFields) -> Result<Document> {
        let id = self.index.index(&fields).await?;
        Ok(Document::from_fields(id, fields))
    }

    /// Plain read; subject to the store's visibility lag.
    pub async fn read(&self, id: &str) -> Result<Option<Document>> {
        self.index.get(id).await
    }

    /// Apply a patch and return the post-update document, or `None` if
    /// the id is absent.
    pub async fn update(&self, id: &str, patch: &DocumentPatch) -> Result<Option<Document>> {
        match self.index.update(id, patch).await? {
            UpdateOutcome::NotFound => Ok(None),
            UpdateOutcome::Updated => self.await_visible(id, patch).await.map(Some),
        }
    }

    /// Re-read until the store reflects the patch, within the budget.
    ///
    /// A `None` from `get` inside this window is visibility lag, not a
    /// missing document: the store already acknowledged the update, so
    /// it consumes an attempt like a stale read does.
    async fn await_visible(&self, id: &str, patch: &DocumentPatch) -> Result<Document> {
        for attempt in 1..=self.policy.attempts {
            match self.index.get(id).await? {
                Some(doc) if patch.is_applied_to(&doc) => return Ok(doc),
                observed => {
                    debug!(
                        id,
                        attempt,
                        stale = observed.is_some(),
                        "update not yet visible"
                    );
                }
            }
            if attempt < self.policy.attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        warn!(
            id,
            attempts = self.policy.attempts,
            "update accepted but never observed; reporting visibility timeout"
        );
        Err(Error::VisibilityTimeout {
            id: id.to_string(),
            attempts: self.policy.attempts,
        })
    }

    /// Delete is terminal once acknowledged. Reads and searches may
    /// transiently still observe the document; that lag is not bridged.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.index.delete(id).await
    }

    /// Match-all search; eventually reflects all prior writes.
    pub async fn search(&self) -> Result<Vec<Document>> {
        self.index.search_all().await
    }
}
