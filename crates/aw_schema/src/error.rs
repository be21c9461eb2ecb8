//! Error types for schema lookup and caching.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// Requested language code is not in the supported list. Fails fast,
    /// before any I/O.
    #[error("unsupported API language code '{0}'")]
    UnsupportedLanguage(String),

    /// Neither the cache nor the fetcher produced a schema; the caller
    /// surfaces this as "unknown game".
    #[error("no schema available for appid {appid}: {reason}")]
    Unavailable { appid: String, reason: String },

    /// Filesystem I/O failed while reading or writing a cache document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache document failed to parse or serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
