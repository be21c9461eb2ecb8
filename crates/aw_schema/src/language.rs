//! Supported Steam API language codes.
//!
//! The schema endpoints reject unknown codes server-side, but only after a
//! round trip; validating here keeps "typo in the config file" from looking
//! like a network failure.

use crate::{Result, SchemaError};

/// API language codes accepted by the schema endpoints.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "arabic",
    "brazilian",
    "bulgarian",
    "czech",
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "greek",
    "hungarian",
    "indonesian",
    "italian",
    "japanese",
    "koreana",
    "latam",
    "norwegian",
    "polish",
    "portuguese",
    "romanian",
    "russian",
    "schinese",
    "spanish",
    "swedish",
    "tchinese",
    "thai",
    "turkish",
    "ukrainian",
    "vietnamese",
];

/// Validate an API language code, before any I/O happens.
pub fn validate_language(lang: &str) -> Result<()> {
    if SUPPORTED_LANGUAGES.contains(&lang) {
        Ok(())
    } else {
        Err(SchemaError::UnsupportedLanguage(lang.to_string()))
    }
}
