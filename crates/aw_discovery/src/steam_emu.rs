//! Steam emulator / crack save scans.
//!
//! Every supported emulator writes per-game state under `<root>/<appid>/`;
//! the roots differ per crack group and the group is inferred back from the
//! path. EMPRESS nests the actual records one level deeper, under
//! `remote/<appid>`.

use crate::{paths, ArtifactDescriptor, Candidate, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Emulator save roots relative to `%APPDATA%`.
const APPDATA_ROOTS: &[&str] = &[
    "Goldberg SteamEmu Saves",
    "GSE Saves",
    "EMPRESS",
    "Steam/CODEX",
    "SmartSteamEmu",
    "CreamAPI",
];

/// Scan all known emulator roots plus the caller-supplied extra directories
/// (user custom dirs that earlier probes did not claim).
pub fn scan(additional: &[Utf8PathBuf]) -> Result<Vec<Candidate>> {
    let mut roots: Vec<Utf8PathBuf> = Vec::new();

    if let Some(appdata) = paths::appdata() {
        roots.extend(APPDATA_ROOTS.iter().map(|sub| appdata.join(sub)));
    }
    if let Some(documents) = paths::my_documents() {
        roots.push(documents.join("SkidRow"));
    }
    roots.extend(additional.iter().cloned());

    Ok(scan_roots(&roots))
}

/// Enumerate `<root>/<appid>/` under each root, in the given root order.
pub fn scan_roots(roots: &[Utf8PathBuf]) -> Vec<Candidate> {
    let mut data = Vec::new();

    for root in roots {
        for (appid, dir) in paths::numeric_subdirs(root) {
            let source = source_label(dir.as_str());
            // EMPRESS keeps the achievement records under remote/<appid>.
            let dir = if source == Some("Goldberg (EMPRESS)") {
                dir.join("remote").join(&appid)
            } else {
                dir
            };

            data.push(Candidate {
                appid,
                source: source.map(str::to_string),
                artifact: ArtifactDescriptor::Dir(dir),
            });
        }
    }

    data
}

/// Infer the crack group from the artifact path. Case-insensitive; the
/// generic "Steam" match comes last so `Steam/CODEX` wins over it.
fn source_label(path: &str) -> Option<&'static str> {
    let lower = path.to_ascii_lowercase();
    let contains = |needle: &str| lower.contains(&needle.to_ascii_lowercase());

    if contains("CODEX") {
        Some("Codex")
    } else if contains("RUNE") {
        Some("Rune")
    } else if contains("OnlineFix") {
        Some("OnlineFix")
    } else if contains("Goldberg") || contains("GSE") {
        Some("Goldberg")
    } else if contains("EMPRESS") {
        Some("Goldberg (EMPRESS)")
    } else if contains("SkidRow") {
        Some("Skidrow")
    } else if contains("SmartSteamEmu") {
        Some("SmartSteamEmu")
    } else if contains("ProgramData/Steam") {
        Some("Reloaded - 3DM")
    } else if contains("CreamAPI") {
        Some("CreamAPI")
    } else if contains("Steam") {
        Some("Steam")
    } else {
        None
    }
}

/// Whether `dir` sits under a path this module would label — used by the
/// user-dir probe to tag custom directories consistently.
pub fn label_for_dir(dir: &Utf8Path) -> Option<&'static str> {
    source_label(dir.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn labels_follow_path_contents() {
        assert_eq!(source_label("/x/Steam/CODEX/123"), Some("Codex"));
        assert_eq!(source_label("/x/GSE Saves/123"), Some("Goldberg"));
        assert_eq!(
            source_label("/x/EMPRESS/123"),
            Some("Goldberg (EMPRESS)")
        );
        assert_eq!(source_label("/docs/SkidRow/123"), Some("Skidrow"));
        assert_eq!(source_label("/y/somewhere/123"), None);
    }

    #[test]
    fn empress_candidates_point_into_remote() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let empress = root.join("EMPRESS");
        fs::create_dir_all(empress.join("480").join("remote").as_std_path()).unwrap();

        let found = scan_roots(&[empress.clone()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appid, "480");
        assert_eq!(
            found[0].artifact,
            ArtifactDescriptor::Dir(empress.join("480").join("remote").join("480"))
        );
    }

    #[test]
    fn multiple_roots_keep_discovery_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let codex = root.join("Steam").join("CODEX");
        let gse = root.join("GSE Saves");
        fs::create_dir_all(codex.join("480").as_std_path()).unwrap();
        fs::create_dir_all(gse.join("480").as_std_path()).unwrap();

        let found = scan_roots(&[codex, gse]);
        assert_eq!(found.len(), 2, "duplicates are kept for the merge step");
        assert_eq!(found[0].source.as_deref(), Some("Codex"));
        assert_eq!(found[1].source.as_deref(), Some("Goldberg"));
    }
}
