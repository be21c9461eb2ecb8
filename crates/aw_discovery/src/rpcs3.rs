//! RPCS3 trophy discovery.
//!
//! A configured user directory pointing at (or into) an RPCS3 install
//! contains per-game trophy directories (`NPWR....._00`) each holding a
//! `TROPUSR.DAT`. The trophy dir name doubles as the game identifier.

use crate::{ArtifactDescriptor, Candidate};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

const TROPHY_FILE: &str = "TROPUSR.DAT";
const MAX_DEPTH: usize = 6;

/// Find trophy sets under `dir`. Unreadable subtrees are skipped silently;
/// an empty result just means this is not an RPCS3 directory.
pub fn scan(dir: &Utf8Path) -> Vec<Candidate> {
    let mut data = Vec::new();

    for entry in WalkDir::new(dir.as_std_path())
        .max_depth(MAX_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() || entry.file_name() != TROPHY_FILE {
            continue;
        }
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) else {
            continue;
        };
        let Some(trophy_dir) = path.parent().and_then(|p| p.file_name()) else {
            continue;
        };

        data.push(Candidate::new(
            trophy_dir,
            "RPCS3",
            ArtifactDescriptor::TrophyFile(path.clone()),
        ));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_trophy_files_by_parent_dir_name() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let trophy = root.join("trophy").join("NPWR06812_00");
        fs::create_dir_all(trophy.as_std_path()).unwrap();
        fs::write(trophy.join(TROPHY_FILE).as_std_path(), b"TROP\x00\x00\x00\x00").unwrap();

        let found = scan(&root);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appid, "NPWR06812_00");
        assert_eq!(found[0].source.as_deref(), Some("RPCS3"));
    }

    #[test]
    fn non_rpcs3_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        assert!(scan(&root).is_empty());
    }
}
