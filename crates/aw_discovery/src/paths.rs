//! Well-known base directories used by artifact scans.

use crate::reg;
use camino::Utf8PathBuf;

/// `%APPDATA%`, where most Steam emulators keep their saves.
pub fn appdata() -> Option<Utf8PathBuf> {
    std::env::var("APPDATA").ok().map(Utf8PathBuf::from)
}

/// The user's Documents folder, resolved through the shell-folders registry
/// key so redirected profiles are honored.
pub fn my_documents() -> Option<Utf8PathBuf> {
    reg::read_string(
        "HKCU",
        "Software/Microsoft/Windows/CurrentVersion/Explorer/User Shell Folders",
        "Personal",
    )
    .map(Utf8PathBuf::from)
}

/// Direct subdirectories of `dir` whose names are all digits, in directory
/// order: the `<root>/<appid>/` convention shared by every Steam emulator.
pub fn numeric_subdirs(dir: &camino::Utf8Path) -> Vec<(String, Utf8PathBuf)> {
    let entries = match std::fs::read_dir(dir.as_std_path()) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
                Some((name.clone(), dir.join(name)))
            } else {
                None
            }
        })
        .collect()
}
