//! DocStore Service - Document lifecycle over an eventually-consistent store
//!
//! Two layers live here. The `Coordinator` bridges the gap between
//! "write accepted" and "write visible" for a store whose indexing is
//! asynchronous. `DocumentService` sits above it and implements the
//! caller-facing lifecycle: validation, the create/read/update/delete/
//! search operations, and the "deleted" vs "not found" disambiguation.

pub mod coordinator;
pub mod lifecycle;

pub use coordinator::{Coordinator, VisibilityPolicy};
pub use lifecycle::DocumentService;
