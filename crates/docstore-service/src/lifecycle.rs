//! Document lifecycle service
//!
//! Caller-facing operations over the coordinator. Validation is strictly
//! local and runs before any store call, so a malformed request is
//! always distinguishable from a store fault. Lifecycle enrichment
//! happens here too: a store-level "not found" outcome becomes the
//! typed `DocumentNotFound` error, never a silent success.
//!
//! A field supplied as an empty string is treated the same as an absent
//! field: blank values are never written into the store.

use crate::coordinator::{Coordinator, VisibilityPolicy};
use docstore_common::{Document, DocumentFields, DocumentPatch, Error, Result};
use docstore_index::{DeleteOutcome, DocumentIndex};

/// The document lifecycle service: create, read, search, update, delete.
pub struct DocumentService<I> {
    coordinator: Coordinator<I>,
}

impl<I: DocumentIndex> DocumentService<I> {
    pub const fn new(index: I, policy: VisibilityPolicy) -> Self {
        Self {
            coordinator: Coordinator::new(index, policy),
        }
    }

    /// Create a document; both fields must be non-empty.
    pub async fn create(&self, fields: DocumentFields) -> Result<Document> {
        if fields.name.trim().is_empty() {
            return Err(Error::invalid_argument("name must not be empty"));
        }
        if fields.email.trim().is_empty() {
            return Err(Error::invalid_argument("email must not be empty"));
        }
        self.coordinator.create(fields).await
    }

    /// Read a document by id.
    pub async fn read(&self, id: &str) -> Result<Document> {
        Self::validate_id(id)?;
        self.coordinator
            .read(id)
            .await?
            .ok_or_else(|| Error::not_found(id))
    }

    /// List all documents, ordered by store relevance.
    pub async fn search(&self) -> Result<Vec<Document>> {
        self.coordinator.search().await
    }

    /// Apply a partial update and return the post-update document.
    pub async fn update(&self, id: &str, patch: DocumentPatch) -> Result<Document> {
        Self::validate_id(id)?;
        let patch = normalize_patch(patch);
        if patch.is_empty() {
            return Err(Error::NoFieldsToUpdate);
        }
        self.coordinator
            .update(id, &patch)
            .await?
            .ok_or_else(|| Error::not_found(id))
    }

    /// Delete a document. Deleting an already-deleted (or unknown) id
    /// reports `DocumentNotFound`, never a second success.
    pub async fn delete(&self, id: &str) -> Result<()> {
        Self::validate_id(id)?;
        match self.coordinator.delete(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(Error::not_found(id)),
        }
    }

    /// Whether the backing store currently answers requests.
    pub async fn health(&self) -> bool {
        self.coordinator.index().health_check().await
    }

    /// The underlying store adapter (test observability)
    pub const fn index(&self) -> &I {
        self.coordinator.index()
    }

    fn validate_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(Error::invalid_argument("id must not be empty"));
        }
        Ok(())
    }
}

/// Drop fields supplied as empty strings; they count as absent.
fn normalize_patch(patch: DocumentPatch) -> DocumentPatch {
    DocumentPatch {
        name: patch.name.filter(|name| !name.trim().is_empty()),
        email: patch.email.filter(|email| !email.trim().is_empty()),
    }
}
