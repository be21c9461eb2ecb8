//! Error types for source discovery.
//!
//! Per-source failures are logged at their origin and never escalate past
//! [`discover`](crate::discover); these variants exist so individual
//! scanners can report *why* they produced nothing.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Filesystem enumeration failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or mapping cache document failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source's anchor (registry key, install dir) was not found or the
    /// source is disabled on this machine.
    #[error("{0}")]
    SourceUnavailable(String),
}
