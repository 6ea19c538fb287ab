//! DocStore Common - Shared types and utilities
//!
//! This crate provides the document types, error definitions, and
//! configuration structures used across all DocStore components.

pub mod config;
pub mod error;
pub mod types;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use types::{Document, DocumentFields, DocumentPatch};
