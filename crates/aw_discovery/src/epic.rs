//! Epic via the Nemirtingas Epic emulator.
//!
//! Same two-level `<account>/<id>` layout as the GOG emulator, with Epic
//! product ids. The title-to-Steam-appid resolution is network work done
//! elsewhere; its result is honored through the local mapping cache. Unlike
//! GOG, an unmapped Epic id is still a valid candidate under its own id —
//! some Epic titles have no Steam release at all ("Epic exclusives") and
//! their schemas come from the Epic achievements endpoint instead.

use crate::{paths, ArtifactDescriptor, Candidate, Result};
use aw_schema::CacheStore;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// One resolved Epic product id. `steamid` stays `None` for exclusives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicMapping {
    pub epicid: String,
    #[serde(default)]
    pub steamid: Option<String>,
}

pub fn scan(cache: &CacheStore) -> Result<Vec<Candidate>> {
    let Some(appdata) = paths::appdata() else {
        return Ok(Vec::new());
    };
    scan_root(&appdata.join("NemirtingasEpicEmu"), cache)
}

pub fn scan_root(root: &Utf8PathBuf, cache: &CacheStore) -> Result<Vec<Candidate>> {
    let mapping: Vec<EpicMapping> = cache
        .load_json(&cache.mapping_path("epic"))
        .unwrap_or_default()
        .unwrap_or_default();

    let mut data = Vec::new();
    for entry in std::fs::read_dir(root.as_std_path()).into_iter().flatten() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let Ok(account) = Utf8PathBuf::from_path_buf(entry.path()) else {
            continue;
        };

        for (epicid, dir) in paths::numeric_subdirs(&account) {
            let appid = mapping
                .iter()
                .find(|m| m.epicid == epicid)
                .and_then(|m| m.steamid.clone())
                .unwrap_or_else(|| epicid.clone());

            data.push(Candidate::new(
                appid,
                "epic",
                ArtifactDescriptor::Dir(dir),
            ));
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Utf8PathBuf, CacheStore) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let cache = CacheStore::new(root.join("cache"));
        (tmp, root, cache)
    }

    #[test]
    fn unmapped_id_is_kept_under_its_own_id() {
        let (_tmp, root, cache) = setup();
        let emu = root.join("emu");
        fs::create_dir_all(emu.join("acc").join("123456").as_std_path()).unwrap();

        let found = scan_root(&emu, &cache).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appid, "123456");
    }

    #[test]
    fn mapped_id_is_remapped_to_steam() {
        let (_tmp, root, cache) = setup();
        let emu = root.join("emu");
        fs::create_dir_all(emu.join("acc").join("222").as_std_path()).unwrap();
        cache
            .save_json(
                &cache.mapping_path("epic"),
                &vec![EpicMapping {
                    epicid: "222".into(),
                    steamid: Some("620".into()),
                }],
            )
            .unwrap();

        let found = scan_root(&emu, &cache).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appid, "620");
    }
}
