//! Canonical achievement schema: the source-of-truth list of achievements
//! for a game, independent of any local unlock state.
//!
//! Fetching a schema is network work and stays outside this workspace; it is
//! consumed through the [`SchemaFetcher`] trait. What lives here is the data
//! model, the supported-language gate, the filesystem cache and the
//! [`SchemaProvider`] that ties them together (cache-first, write-through on
//! first successful fetch, no automatic expiry — achievement definitions
//! rarely change once published).

use serde::{Deserialize, Serialize};

pub mod cache;
pub mod error;
pub mod language;
pub mod provider;

pub use cache::CacheStore;
pub use error::{Result, SchemaError};
pub use language::{validate_language, SUPPORTED_LANGUAGES};
pub use provider::{SchemaFetcher, SchemaProvider};

/// One achievement definition as published by the platform.
///
/// `name` is the stable string key and the sole identity used when matching
/// local artifacts; everything else is display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntry {
    pub name: String,
    #[serde(default)]
    pub default_value: i64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icongray: String,
}

impl SchemaEntry {
    pub fn named(name: impl Into<String>) -> Self {
        SchemaEntry {
            name: name.into(),
            default_value: 0,
            display_name: String::new(),
            description: String::new(),
            hidden: false,
            icon: String::new(),
            icongray: String::new(),
        }
    }
}

/// Display art references for a game. URLs or cached file paths; resolution
/// and backfilling happen outside the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameArt {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// The canonical schema for one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSchema {
    pub name: String,
    pub appid: String,
    #[serde(default)]
    pub img: GameArt,
    pub achievements: Vec<SchemaEntry>,
}

impl GameSchema {
    pub fn total(&self) -> usize {
        self.achievements.len()
    }
}
