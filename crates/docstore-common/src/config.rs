//! Configuration types for DocStore
//!
//! This module defines the store-facing configuration shared by the
//! adapter and the consistency coordinator.

use serde::{Deserialize, Serialize};

/// Configuration for talking to the backing search store
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store endpoint URL (e.g., "http://localhost:9200")
    pub endpoint: String,
    /// Index (collection) name documents live in
    pub index: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Post-update re-read attempts before reporting a visibility timeout
    #[serde(default = "default_visibility_attempts")]
    pub visibility_attempts: u32,
    /// Backoff between re-read attempts in milliseconds
    #[serde(default = "default_visibility_backoff_ms")]
    pub visibility_backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_visibility_attempts() -> u32 {
    3
}

fn default_visibility_backoff_ms() -> u64 {
    200
}

impl StoreConfig {
    /// Create a new store config with default timeouts
    pub fn new(endpoint: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            index: index.into(),
            timeout_ms: default_timeout_ms(),
            visibility_attempts: default_visibility_attempts(),
            visibility_backoff_ms: default_visibility_backoff_ms(),
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the visibility re-read budget
    #[must_use]
    pub const fn with_visibility_attempts(mut self, attempts: u32) -> Self {
        self.visibility_attempts = attempts;
        self
    }

    /// Set the backoff between re-read attempts
    #[must_use]
    pub const fn with_visibility_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.visibility_backoff_ms = backoff_ms;
        self
    }
}
