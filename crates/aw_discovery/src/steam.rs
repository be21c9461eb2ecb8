//! Legit Steam install discovery.
//!
//! The Steam client keeps a per-user stat cache under
//! `<steam>/appcache/stats/UserGameStats_<user>_<appid>.bin`; one file per
//! game a logged-in account has stats for. Those filenames are the candidate
//! list. Actually reading the unlock state goes through the Steam Web API
//! (network, out of scope) and its local JSON cache — see the
//! [`SteamUserStats`](crate::ArtifactDescriptor::SteamUserStats) decode path.

use crate::{paths, reg, ArtifactDescriptor, Candidate, DiscoveryError, Result, SteamListing};
use camino::Utf8PathBuf;

/// Resolve the Steam install directory.
///
/// Some emulators repoint `HKCU .../SteamPath` at the game's own directory
/// (the Steam client fixes the key on its next start); the HKLM install
/// path is the fallback for that case. A hit must actually contain
/// `steam.exe` to count.
pub fn steam_path() -> Result<Utf8PathBuf> {
    let hives = [
        ("HKCU", "Software/Valve/Steam", "SteamPath"),
        ("HKLM", "Software/WOW6432Node/Valve/Steam", "InstallPath"),
    ];

    for (hive, key, name) in hives {
        if let Some(path) = reg::read_string(hive, key, name) {
            let path = Utf8PathBuf::from(path);
            if path.join("steam.exe").as_std_path().exists() {
                return Ok(path);
            }
        }
    }

    Err(DiscoveryError::SourceUnavailable(
        "Steam path not found".into(),
    ))
}

/// Steam account ids present on this machine: registry first, `userdata/`
/// directory names as fallback.
pub fn steam_users(steam_path: &Utf8PathBuf) -> Vec<String> {
    let from_registry = reg::list_subkeys("HKCU", "Software/Valve/Steam/Users");
    if !from_registry.is_empty() {
        return from_registry;
    }

    paths::numeric_subdirs(&steam_path.join("userdata"))
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Enumerate owned games with a stats cache, per public account.
pub fn scan_legit(listing: SteamListing, account_filter: Option<&str>) -> Result<Vec<Candidate>> {
    if !reg::key_exists("HKCU", "Software/Valve/Steam") {
        return Err(DiscoveryError::SourceUnavailable(
            "legit Steam not found or disabled".into(),
        ));
    }

    let steam = steam_path()?;
    let mut users = steam_users(&steam);
    if users.is_empty() {
        return Err(DiscoveryError::SourceUnavailable(
            "no Steam user id found".into(),
        ));
    }
    if let Some(filter) = account_filter {
        if users.iter().any(|u| u == filter) {
            users.retain(|u| u == filter);
        }
    }

    let stats_dir = steam.join("appcache").join("stats");
    let mut data = Vec::new();

    for entry in std::fs::read_dir(stats_dir.as_std_path())? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let Some((user, appid)) = parse_stats_filename(&name) else {
            continue;
        };

        if !users.iter().any(|u| *u == user) {
            continue;
        }
        if listing == SteamListing::InstalledOnly && !is_installed(&appid) {
            continue;
        }

        data.push(Candidate {
            appid,
            source: Some(format!("Steam ({user})")),
            artifact: ArtifactDescriptor::SteamUserStats { user },
        });
    }

    Ok(data)
}

fn is_installed(appid: &str) -> bool {
    reg::read_dword("HKCU", &format!("Software/Valve/Steam/Apps/{appid}"), "Installed")
        == Some(1)
}

/// Split `UserGameStats_<user>_<appid>.bin` into its two ids.
fn parse_stats_filename(name: &str) -> Option<(String, String)> {
    let rest = name.strip_prefix("UserGameStats_")?.strip_suffix(".bin")?;
    let (user, appid) = rest.split_once('_')?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    (numeric(user) && numeric(appid)).then(|| (user.to_string(), appid.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_filename_parses() {
        assert_eq!(
            parse_stats_filename("UserGameStats_11223344_620.bin"),
            Some(("11223344".into(), "620".into()))
        );
        assert_eq!(parse_stats_filename("UserGameStats_x_620.bin"), None);
        assert_eq!(parse_stats_filename("appinfo.vdf"), None);
        assert_eq!(parse_stats_filename("UserGameStats_620.bin"), None);
    }
}
