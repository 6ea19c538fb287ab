//! Core type definitions for DocStore
//!
//! A document is the unit the service manages: an opaque store-assigned
//! id plus the caller-owned fields. Patches carry only the fields the
//! caller wants changed.

use serde::{Deserialize, Serialize};

/// A document as stored in the search index.
///
/// `id` is assigned by the store on creation and never changes; two
/// documents are the same entity iff their ids match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Document {
    /// Assemble a document from a store-assigned id and caller fields
    #[must_use]
    pub fn from_fields(id: impl Into<String>, fields: DocumentFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            email: fields.email,
        }
    }

    /// The caller-owned part of the document
    #[must_use]
    pub fn fields(&self) -> DocumentFields {
        DocumentFields {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The caller-owned fields of a document (create payload)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    pub name: String,
    pub email: String,
}

/// A partial update: only present fields are applied, absent fields
/// leave the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl DocumentPatch {
    /// True when no field is present
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// True when a document's fields already reflect this patch.
    ///
    /// Used by the post-update re-read to decide whether the store has
    /// made the write visible yet.
    #[must_use]
    pub fn is_applied_to(&self, doc: &Document) -> bool {
        self.name.as_ref().is_none_or(|name| *name == doc.name)
            && self.email.as_ref().is_none_or(|email| *email == doc.email)
    }

    /// Apply the patch to a set of fields, returning the merged result
    #[must_use]
    pub fn apply_to(&self, fields: &DocumentFields) -> DocumentFields {
        DocumentFields {
            name: self.name.clone().unwrap_or_else(|| fields.name.clone()),
            email: self.email.clone().unwrap_or_else(|| fields.email.clone()),
        }
    }
}
