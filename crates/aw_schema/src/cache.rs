//! Filesystem-backed cache area.
//!
//! One JSON document per key, grouped by concern under a single root
//! (typically the app's user-data directory):
//!
//! ```text
//! <root>/steam_cache/schema/<lang>/<appid>.json   cached game schemas
//! <root>/steam_cache/data/<appid>.json            watchdog data cache
//! <root>/steam_cache/user/<user>/<appid>.json     cached Steam user stats
//! <root>/steam_cache/<name>.json                  id mapping caches (gog, epic)
//! <root>/cfg/exclusion.json                       user appid blacklist
//! ```
//!
//! Concurrent writers for the same key are last-writer-wins; schema content
//! for a given `(appid, language)` is identical across fetchers, so the race
//! window during a cache miss is benign. No locks are taken.

use crate::{GameSchema, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{de::DeserializeOwned, Serialize};

/// Handle to the cache area. Cheap to clone; holds only the root path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: Utf8PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        CacheStore { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn schema_path(&self, appid: &str, lang: &str) -> Utf8PathBuf {
        self.root
            .join("steam_cache/schema")
            .join(lang)
            .join(format!("{appid}.json"))
    }

    pub fn data_path(&self, appid: &str) -> Utf8PathBuf {
        self.root
            .join("steam_cache/data")
            .join(format!("{appid}.json"))
    }

    pub fn user_stats_path(&self, user: &str, appid: &str) -> Utf8PathBuf {
        self.root
            .join("steam_cache/user")
            .join(user)
            .join(format!("{appid}.json"))
    }

    /// Path of a named id-mapping cache (`gog`, `epic`).
    pub fn mapping_path(&self, name: &str) -> Utf8PathBuf {
        self.root.join("steam_cache").join(format!("{name}.json"))
    }

    pub fn exclusion_path(&self) -> Utf8PathBuf {
        self.root.join("cfg/exclusion.json")
    }

    pub fn user_dirs_path(&self) -> Utf8PathBuf {
        self.root.join("cfg/folders.json")
    }

    /// Load a cached schema. `Ok(None)` when not cached.
    pub fn load_schema(&self, appid: &str, lang: &str) -> Result<Option<GameSchema>> {
        self.load_json(&self.schema_path(appid, lang))
    }

    /// Persist a schema for `(appid, language)`; overwrites silently.
    pub fn save_schema(&self, schema: &GameSchema, lang: &str) -> Result<()> {
        self.save_json(&self.schema_path(&schema.appid, lang), schema)
    }

    /// Appids present in the watchdog data cache, in directory order.
    pub fn data_appids(&self) -> Vec<String> {
        let dir = self.root.join("steam_cache/data");
        let entries = match std::fs::read_dir(dir.as_std_path()) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter_map(|name| {
                let stem = name.strip_suffix(".json")?;
                stem.chars()
                    .all(|c| c.is_ascii_digit())
                    .then(|| stem.to_string())
            })
            .collect()
    }

    /// Read one JSON document. `Ok(None)` when the file does not exist.
    pub fn load_json<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<Option<T>> {
        if !path.as_std_path().exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path.as_std_path())?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write one JSON document, creating parent directories as needed.
    pub fn save_json<T: Serialize>(&self, path: &Utf8Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }
}
