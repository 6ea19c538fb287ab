//! In-process store backend
//!
//! Backs the gateway's development mode and the service-layer tests.
//! Models the one store property the coordinator exists to handle: a
//! configurable visibility lag, where a freshly written revision stays
//! invisible to reads for a fixed number of subsequent read operations.
//!
//! Deletes take effect immediately here; the lag applies to index and
//! update writes, which is what the coordinator's re-read path exercises.

use crate::{DeleteOutcome, DocumentIndex, UpdateOutcome};
use async_trait::async_trait;
use docstore_common::{Document, DocumentFields, DocumentPatch, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-operation call counters, for asserting that validation failures
/// never reach the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub index: u64,
    pub get: u64,
    pub update: u64,
    pub delete: u64,
    pub search: u64,
}

struct Entry {
    /// Latest accepted revision
    committed: DocumentFields,
    /// Revision lagged reads still observe (`None` for a document that
    /// has never been visible)
    visible: Option<DocumentFields>,
    /// Reads left before `committed` becomes visible
    lag_left: u32,
}

impl Entry {
    /// The revision a read observes right now, consuming one lag read
    fn observe(&mut self) -> Option<DocumentFields> {
        if self.lag_left > 0 {
            self.lag_left -= 1;
            self.visible.clone()
        } else {
            Some(self.committed.clone())
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    calls: CallCounts,
}

/// In-memory document store with simulated visibility lag
#[derive(Default)]
pub struct MemoryIndex {
    inner: Mutex<Inner>,
    lag_reads: u32,
}

impl MemoryIndex {
    /// Create a store where writes are immediately visible
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store where each write stays invisible for the next
    /// `lag_reads` read operations on that document.
    #[must_use]
    pub fn with_visibility_lag(lag_reads: u32) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            lag_reads,
        }
    }

    /// Snapshot of the per-operation call counters
    #[must_use]
    pub fn call_counts(&self) -> CallCounts {
        self.inner.lock().calls
    }
}

#[async_trait]
impl DocumentIndex for MemoryIndex {
    async fn index(&self, fields: &DocumentFields) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.calls.index += 1;

        let id = Uuid::new_v4().to_string();
        inner.entries.insert(
            id.clone(),
            Entry {
                committed: fields.clone(),
                visible: None,
                lag_left: self.lag_reads,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        let mut inner = self.inner.lock();
        inner.calls.get += 1;

        Ok(inner.entries.get_mut(id).and_then(|entry| {
            entry
                .observe()
                .map(|fields| Document::from_fields(id, fields))
        }))
    }

    async fn update(&self, id: &str, patch: &DocumentPatch) -> Result<UpdateOutcome> {
        let mut inner = self.inner.lock();
        inner.calls.update += 1;

        let Some(entry) = inner.entries.get_mut(id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        // Keep the pre-write view observable through the lag window
        entry.visible = if entry.lag_left > 0 {
            entry.visible.clone()
        } else {
            Some(entry.committed.clone())
        };
        entry.committed = patch.apply_to(&entry.committed);
        entry.lag_left = self.lag_reads;
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let mut inner = self.inner.lock();
        inner.calls.delete += 1;

        if inner.entries.remove(id).is_some() {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn search_all(&self) -> Result<Vec<Document>> {
        let mut inner = self.inner.lock();
        inner.calls.search += 1;

        let mut docs: Vec<Document> = inner
            .entries
            .iter_mut()
            .filter_map(|(id, entry)| {
                entry
                    .observe()
                    .map(|fields| Document::from_fields(id.clone(), fields))
            })
            .collect();
        // Stable order so repeated searches are comparable
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
