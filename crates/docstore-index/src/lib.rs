//! DocStore Index - Document store adapter
//!
//! This crate defines the narrow operation set the service consumes from
//! the backing search store, plus two backends: `EsIndex` (HTTP client
//! for an Elasticsearch-compatible store) and `MemoryIndex` (in-process,
//! for tests and development).
//!
//! The adapter performs no retries; retry policy belongs to the
//! consistency coordinator. "Not found" is a typed outcome, never a
//! raised fault, so callers branch on domain state without error-based
//! control flow.

pub mod es;
pub mod memory;

use async_trait::async_trait;
use docstore_common::{Document, DocumentFields, DocumentPatch, Result};

// Re-exports
pub use es::EsIndex;
pub use memory::{CallCounts, MemoryIndex};

/// Outcome of an update against the store.
///
/// Decided from the store's reported result, never inferred from the
/// absence of a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// Outcome of a delete against the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// The five operations DocStore consumes from the backing store.
///
/// Every operation carries the configured bounded timeout; transport
/// failures surface as `Timeout`/`ConnectionFailed`/`ServiceUnavailable`
/// errors, while a missing id is always a typed domain outcome.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Index a new document; returns the store-assigned id.
    async fn index(&self, fields: &DocumentFields) -> Result<String>;

    /// Fetch a document by id. `None` means the id is absent.
    async fn get(&self, id: &str) -> Result<Option<Document>>;

    /// Apply a partial update to an existing document.
    async fn update(&self, id: &str, patch: &DocumentPatch) -> Result<UpdateOutcome>;

    /// Delete a document by id.
    async fn delete(&self, id: &str) -> Result<DeleteOutcome>;

    /// Match-all search, ordered by store relevance.
    async fn search_all(&self) -> Result<Vec<Document>>;

    /// Whether the store currently answers requests.
    async fn health_check(&self) -> bool;
}
