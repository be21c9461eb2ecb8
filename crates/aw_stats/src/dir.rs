//! First-match-wins directory scan.
//!
//! A "file" artifact from discovery is a directory; the actual filename
//! varies by producer. The candidate list below is tried in a fixed priority
//! order and the first file that parses without error wins — even if it
//! parsed to zero entries. There is deliberately no fallback to the next
//! candidate after a successful parse and no "pick the best content" logic;
//! callers depend on this ordering.

use crate::{ini, json, sse, DecodeError, RawStatRecord, Result};
use camino::Utf8Path;

/// Known achievement filenames, in try order.
pub const CANDIDATE_FILES: &[&str] = &[
    "achievements.ini",
    "achievements.json",
    "achiev.ini",
    "stats.ini",
    "Achievements.Bin",
    "achieve.dat",
    "Achievements.ini",
    "stats/achievements.ini",
    "stats.bin",
    "stats/CreamAPI.Achievements.cfg",
];

/// Decode the achievement artifact inside `dir`.
///
/// Returns [`DecodeError::NoArtifact`] only when no candidate file parses;
/// an empty record from the first parsing candidate is a valid result the
/// caller should log as a warning, not an error.
pub fn decode_dir(dir: &Utf8Path) -> Result<RawStatRecord> {
    for name in CANDIDATE_FILES {
        let path = dir.join(name);
        match decode_file(&path) {
            Ok(record) => return Ok(record),
            Err(err) => {
                tracing::debug!("candidate '{path}' did not parse: {err}");
            }
        }
    }

    Err(DecodeError::NoArtifact(dir.to_owned()))
}

/// Decode one file by its name: `.json` files as JSON, `stats.bin` as the
/// binary CRC-keyed format, everything else as sectioned key/value text
/// (`Achievements.Bin` and `achieve.dat` are INI despite their extensions).
fn decode_file(path: &Utf8Path) -> Result<RawStatRecord> {
    let file_name = path.file_name().unwrap_or_default();

    if file_name == "stats.bin" {
        let bytes = std::fs::read(path.as_std_path())?;
        sse::decode_sse(&bytes)
    } else if path.extension() == Some("json") {
        let text = std::fs::read_to_string(path.as_std_path())?;
        json::decode_json(&text)
    } else {
        let text = std::fs::read_to_string(path.as_std_path())?;
        ini::decode_ini(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;

    fn dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    fn first_matching_candidate_wins() {
        let (_tmp, root) = dir();
        fs::write(root.join("achievements.ini"), "[ACH_A]\nAchieved=1\n").unwrap();
        fs::write(
            root.join("achievements.json"),
            r#"{"ACH_B": {"earned": true}}"#,
        )
        .unwrap();

        let record = decode_dir(&root).unwrap();
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.entries[0].key, "ACH_A");
    }

    #[test]
    fn empty_first_candidate_still_wins() {
        let (_tmp, root) = dir();
        fs::write(root.join("achievements.ini"), "").unwrap();
        fs::write(
            root.join("achievements.json"),
            r#"{"ACH_B": {"earned": true}}"#,
        )
        .unwrap();

        // The INI parses (to nothing), so the JSON must not be consulted.
        assert!(decode_dir(&root).unwrap().is_empty());
    }

    #[test]
    fn malformed_candidate_falls_through() {
        let (_tmp, root) = dir();
        fs::write(root.join("achievements.json"), "{broken").unwrap();
        fs::write(root.join("stats.ini"), "[ACH_A]\nAchieved=1\n").unwrap();

        let record = decode_dir(&root).unwrap();
        assert_eq!(record.entries[0].key, "ACH_A");
    }

    #[test]
    fn nested_stats_dir_candidate() {
        let (_tmp, root) = dir();
        fs::create_dir(root.join("stats")).unwrap();
        fs::write(root.join("stats/achievements.ini"), "[ACH_N]\nAchieved=1\n").unwrap();

        let record = decode_dir(&root).unwrap();
        assert_eq!(record.entries[0].key, "ACH_N");
    }

    #[test]
    fn no_candidate_is_not_found() {
        let (_tmp, root) = dir();
        let err = decode_dir(&root).unwrap_err();
        assert!(err.is_not_found());
    }
}
