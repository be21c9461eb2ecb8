//! GOG via the Nemirtingas Galaxy emulator.
//!
//! Saves live under `%APPDATA%/NemirtingasGalaxyEmu/<account>/<gogid>/` in
//! the usual emulator file formats, but the ids are GOG release ids, not
//! Steam appids. The gamesdb lookup that resolves them is network and out
//! of scope; this scan honors the local mapping cache the lookup maintains
//! and skips (with a warning) any id the cache cannot resolve yet.

use crate::{paths, ArtifactDescriptor, Candidate, Result};
use aw_schema::CacheStore;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// One resolved GOG release id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GogMapping {
    pub gogid: String,
    pub steamid: String,
}

pub fn scan(cache: &CacheStore) -> Result<Vec<Candidate>> {
    let Some(appdata) = paths::appdata() else {
        return Ok(Vec::new());
    };
    scan_root(&appdata.join("NemirtingasGalaxyEmu"), cache)
}

pub fn scan_root(root: &Utf8PathBuf, cache: &CacheStore) -> Result<Vec<Candidate>> {
    let mapping: Vec<GogMapping> = cache
        .load_json(&cache.mapping_path("gog"))
        .unwrap_or_default()
        .unwrap_or_default();

    let mut data = Vec::new();
    // Layout is <root>/<account>/<gogid>/.
    for entry in std::fs::read_dir(root.as_std_path()).into_iter().flatten() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let account = Utf8PathBuf::from_path_buf(entry.path()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "non-UTF8 path")
        })?;

        for (gogid, dir) in paths::numeric_subdirs(&account) {
            match mapping.iter().find(|m| m.gogid == gogid) {
                Some(resolved) => {
                    data.push(Candidate::new(
                        resolved.steamid.clone(),
                        "gog",
                        ArtifactDescriptor::Dir(dir),
                    ));
                }
                None => {
                    tracing::warn!("no Steam appid mapping for GOG release {gogid}, skipping");
                }
            }
        }
    }

    Ok(data)
}
