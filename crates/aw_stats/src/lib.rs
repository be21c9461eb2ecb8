//! Achievement artifact decoders.
//!
//! Every supported distribution/DRM source writes its unlock state in a
//! different on-disk shape: sectioned `key=value` files, JSON arrays or
//! objects, and fixed-layout binary stat blocks. Each decoder in this crate
//! converts exactly one artifact into a [`RawStatRecord`] — a loosely typed,
//! order-preserving set of per-achievement entries that the reconciliation
//! engine matches against a game's schema.
//!
//! Decoders are selected by the artifact type tag supplied by discovery,
//! never by sniffing content across types. The only sniffing that exists is
//! [`dir::decode_dir`], which tries a fixed list of known filenames inside a
//! directory until one parses — first success wins, even if it yields an
//! empty record.

use camino::Utf8PathBuf;
use thiserror::Error;

pub mod dir;
pub mod fields;
pub mod ini;
pub mod json;
pub mod sse;
pub mod trophy;

pub use dir::{decode_dir, CANDIDATE_FILES};
pub use fields::{normalize, NormalizedState};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors produced while decoding a single artifact.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Filesystem I/O failed while reading the artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON artifact failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A matched file had content the decoder could not make sense of.
    #[error("malformed artifact: {0}")]
    Malformed(String),

    /// No known achievement filename inside the directory parsed.
    #[error("no achievement file found in '{0}'")]
    NoArtifact(Utf8PathBuf),
}

impl DecodeError {
    /// Whether this error means "nothing there" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DecodeError::NoArtifact(_))
    }
}

/// A loosely typed value as it appears in an artifact, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl RawValue {
    /// Truthy-achieved test: integer 1, boolean `true`, or the string `"1"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Int(i) => *i == 1,
            RawValue::Bool(b) => *b,
            RawValue::Text(t) => t == "1" || t.eq_ignore_ascii_case("true"),
        }
    }
}

/// One achievement entry as decoded from an artifact.
///
/// `key` is whatever the producer used locally: an API name, a decimal
/// trophy index, or an 8-hex-digit CRC32 digest. Field names are kept
/// verbatim; [`fields::normalize`] maps the producer-specific spellings onto
/// the canonical shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub key: String,
    /// CRC32 candidates (lowercase hex) for schema matching, when the
    /// artifact keys records by checksum instead of by name.
    pub crc: Option<Vec<String>>,
    /// Producer fields in artifact order, names verbatim.
    pub fields: Vec<(String, RawValue)>,
    /// Set when the entry was a bare `key=value` pair with no sub-fields.
    pub scalar: Option<RawValue>,
}

impl RawEntry {
    pub fn new(key: impl Into<String>) -> Self {
        RawEntry {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// First field with the given (case-sensitive) name.
    pub fn field(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The name to match against the schema: an explicit `id`, `apiname` or
    /// `name` field wins over the entry key.
    pub fn api_name(&self) -> &str {
        for candidate in ["id", "apiname", "name"] {
            if let Some(RawValue::Text(t)) = self.field(candidate) {
                return t;
            }
        }
        &self.key
    }
}

/// The decoded contents of one artifact.
///
/// An empty entry list is a valid, non-error result: the artifact exists but
/// records nothing, which callers surface as "0% unlocked", not a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStatRecord {
    pub entries: Vec<RawEntry>,
    /// True for sources that only ever write earned achievements (registry
    /// exporters). Presence of a key then proves `Achieved` by itself.
    pub earned_only: bool,
}

impl RawStatRecord {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn earned_only(entries: Vec<RawEntry>) -> Self {
        RawStatRecord {
            entries,
            earned_only: true,
        }
    }
}
