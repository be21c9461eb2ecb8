//! User-configured custom directory probe.
//!
//! A configured directory can be a game directory itself (its name is the
//! appid and it holds one of the known achievement filenames) or a root of
//! `<appid>/` subdirectories in the emulator convention. Anything that
//! matches neither shape is handed back to the generic appid-folder search
//! by the caller.

use crate::{paths, steam_emu, ArtifactDescriptor, Candidate};
use aw_schema::CacheStore;
use aw_stats::CANDIDATE_FILES;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// One configured directory, as stored in `cfg/folders.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDir {
    pub path: String,
    /// Whether the watchdog should raise notifications for this dir.
    #[serde(default)]
    pub notify: bool,
}

/// Load the configured directory list; missing or broken config is an
/// empty list, not an error.
pub fn configured(cache: &CacheStore) -> Vec<UserDir> {
    match cache.load_json::<Vec<UserDir>>(&cache.user_dirs_path()) {
        Ok(Some(dirs)) => dirs,
        Ok(None) => Vec::new(),
        Err(err) => {
            tracing::warn!("could not read user folders config: {err}");
            Vec::new()
        }
    }
}

fn holds_achievement_file(dir: &Utf8Path) -> bool {
    CANDIDATE_FILES
        .iter()
        .any(|name| dir.join(name).as_std_path().is_file())
}

/// Probe one directory for emulator-style records.
pub fn scan(dir: &Utf8Path) -> Vec<Candidate> {
    // The directory itself may be a game dir named after its appid.
    if let Some(name) = dir.file_name() {
        if name.chars().all(|c| c.is_ascii_digit()) && holds_achievement_file(dir) {
            let source = steam_emu::label_for_dir(dir).unwrap_or("User Custom Dir");
            return vec![Candidate::new(
                name,
                source,
                ArtifactDescriptor::Dir(dir.to_owned()),
            )];
        }
    }

    // Otherwise treat it as a root of <appid>/ game dirs.
    paths::numeric_subdirs(dir)
        .into_iter()
        .filter(|(_, path)| holds_achievement_file(path))
        .map(|(appid, path)| {
            let source = steam_emu::label_for_dir(&path).unwrap_or("User Custom Dir");
            Candidate::new(appid, source, ArtifactDescriptor::Dir(path))
        })
        .collect()
}
