//! Appid exclusion list.
//!
//! Steam's stat cache (and some emulators) accumulate entries for things
//! that are not games: the Steam config pseudo-app, SteamVR, redistributable
//! bundles. A built-in list of those ids is unioned with a user-maintained
//! exclusion file; the merged set is applied as the final discovery filter.

use crate::Result;
use camino::Utf8PathBuf;

/// Appids that are never games.
pub const DEFAULT_EXCLUSIONS: &[u32] = &[
    480,    // Space War
    753,    // Steam Config
    250820, // SteamVR
    228980, // Steamworks Common Redistributables
];

/// User exclusion file handle (`cfg/exclusion.json`, a JSON array of ids).
#[derive(Debug, Clone)]
pub struct Blacklist {
    file: Utf8PathBuf,
}

impl Blacklist {
    pub fn new(file: Utf8PathBuf) -> Self {
        Blacklist { file }
    }

    /// The merged exclusion set: defaults plus user entries, deduplicated.
    /// A missing or unreadable user file contributes nothing.
    pub fn get(&self) -> Result<Vec<u32>> {
        let mut exclude: Vec<u32> = DEFAULT_EXCLUSIONS.to_vec();

        for appid in self.user_entries() {
            if !exclude.contains(&appid) {
                exclude.push(appid);
            }
        }

        Ok(exclude)
    }

    /// Add an appid to the user exclusion file. Idempotent.
    pub fn add(&self, appid: u32) -> Result<()> {
        tracing::info!("blacklisting {appid}");

        let mut entries = self.user_entries();
        if entries.contains(&appid) {
            tracing::info!("{appid} already blacklisted");
            return Ok(());
        }
        entries.push(appid);
        self.write(&entries)
    }

    /// Clear the user exclusion file (built-in defaults always remain).
    pub fn reset(&self) -> Result<()> {
        self.write(&[])
    }

    fn user_entries(&self) -> Vec<u32> {
        std::fs::read_to_string(self.file.as_std_path())
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    fn write(&self, entries: &[u32]) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }
        std::fs::write(
            self.file.as_std_path(),
            serde_json::to_string_pretty(entries)?,
        )?;
        Ok(())
    }
}

/// Whether a candidate appid is on the exclusion list. Non-numeric appids
/// (RPCS3 trophy ids, Epic exclusives) are never excluded.
pub fn is_excluded(exclude: &[u32], appid: &str) -> bool {
    appid
        .parse::<u32>()
        .map(|id| exclude.contains(&id))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist() -> (tempfile::TempDir, Blacklist) {
        let tmp = tempfile::tempdir().unwrap();
        let file = Utf8PathBuf::from_path_buf(tmp.path().join("cfg/exclusion.json")).unwrap();
        (tmp, Blacklist::new(file))
    }

    #[test]
    fn defaults_apply_without_a_user_file() {
        let (_tmp, blacklist) = blacklist();
        let exclude = blacklist.get().unwrap();
        assert!(is_excluded(&exclude, "480"));
        assert!(!is_excluded(&exclude, "730"));
        assert!(!is_excluded(&exclude, "NPWR06812_00"));
    }

    #[test]
    fn add_is_idempotent_and_persisted() {
        let (_tmp, blacklist) = blacklist();
        blacklist.add(730).unwrap();
        blacklist.add(730).unwrap();

        let exclude = blacklist.get().unwrap();
        assert_eq!(exclude.iter().filter(|&&id| id == 730).count(), 1);
        assert!(is_excluded(&exclude, "730"));
    }

    #[test]
    fn reset_keeps_builtin_defaults() {
        let (_tmp, blacklist) = blacklist();
        blacklist.add(730).unwrap();
        blacklist.reset().unwrap();

        let exclude = blacklist.get().unwrap();
        assert!(!is_excluded(&exclude, "730"));
        assert!(is_excluded(&exclude, "480"));
    }
}
