//! Candidate artifact discovery.
//!
//! For a given source-enablement configuration, [`discover`] enumerates
//! every place a supported distribution/DRM layer might have written unlock
//! state and returns one [`Candidate`] per hit: the appid, a human-readable
//! source label, and a descriptor telling the decode step how to read the
//! artifact.
//!
//! Two ordering rules are contracts, not accidents:
//!
//! - Results are **not** deduplicated here. The reconciliation engine's
//!   duplicate-merge logic needs to see every source, and candidate order
//!   drives its first-writer tie-breaks.
//! - User custom directories are probed first and in priority order: RPCS3
//!   trophy data wins over emulator-style records, which win over throwing
//!   the directory into the generic appid-folder search. A directory claimed
//!   by an earlier probe is not scanned again by a later one.
//!
//! A failing source scan is logged and skipped; discovery always returns
//! whatever the other sources produced. Only the final blacklist filter is
//! applied before returning.

use camino::Utf8PathBuf;

pub mod blacklist;
pub mod epic;
pub mod error;
pub mod gog;
pub mod greenluma;
pub mod paths;
pub mod reg;
pub mod rpcs3;
pub mod steam;
pub mod steam_emu;
pub mod uplay;
pub mod user_dir;
pub mod watchdog;

pub use blacklist::Blacklist;
pub use error::{DiscoveryError, Result};

use aw_schema::CacheStore;
use aw_stats::{RawEntry, RawStatRecord, RawValue};

/// Read a registry achievement key (`name -> DWORD`) into a raw record set.
///
/// Registry exporters (GreenLuma, LumaPlay) only ever write achievements
/// that were actually earned, so the record set is flagged earned-only:
/// presence of a value name is proof of `Achieved`, whatever its data says.
pub fn registry_record(hive: &str, key: &str) -> RawStatRecord {
    let entries = reg::list_values(hive, key)
        .into_iter()
        .filter_map(|(name, value)| {
            let flag = value.as_dword()?;
            Some(
                RawEntry::new(name)
                    .with_field("Achieved", RawValue::Int(i64::from(flag != 0))),
            )
        })
        .collect();

    RawStatRecord::earned_only(entries)
}

/// How a discovered artifact is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactDescriptor {
    /// A directory holding one of the known achievement filenames
    /// (first-match-wins scan inside).
    Dir(Utf8PathBuf),
    /// Legit Steam: user stats served from the local user-stats cache.
    SteamUserStats { user: String },
    /// A registry key whose values are `achievement name -> DWORD`.
    /// These exporters only write earned entries.
    Registry { hive: String, key: String },
    /// An RPCS3 trophy set file.
    TrophyFile(Utf8PathBuf),
    /// A document in the watchdog data cache, keyed by the candidate appid.
    Cached,
}

/// One discovered `(appid, source, artifact)` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub appid: String,
    /// Distribution/crack label shown to the user ("Codex", "GreenLuma", ...).
    pub source: Option<String>,
    pub artifact: ArtifactDescriptor,
}

impl Candidate {
    pub fn new(
        appid: impl Into<String>,
        source: impl Into<String>,
        artifact: ArtifactDescriptor,
    ) -> Self {
        Candidate {
            appid: appid.into(),
            source: Some(source.into()),
            artifact,
        }
    }
}

/// How legit Steam installs are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteamListing {
    /// Legit Steam disabled.
    #[default]
    Off,
    /// Only games the registry marks as currently installed.
    InstalledOnly,
    /// Every appid with a user stats cache file.
    All,
}

/// Which sources a discovery pass looks at.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub steam_emu: bool,
    pub legit_steam: SteamListing,
    pub green_luma: bool,
    pub rpcs3: bool,
    pub luma_play: bool,
    pub gog: bool,
    pub epic: bool,
    pub import_cache: bool,
    /// Restrict legit Steam to one account id; `None` keeps all accounts.
    pub steam_account_filter: Option<String>,
    /// User-configured directories, probed before everything else.
    pub user_dirs: Vec<Utf8PathBuf>,
}

impl SourceConfig {
    /// Populate `user_dirs` from the persisted folders config
    /// (`cfg/folders.json`). A missing or broken config leaves the list
    /// empty.
    pub fn with_configured_user_dirs(mut self, cache: &CacheStore) -> Self {
        self.user_dirs = user_dir::configured(cache)
            .into_iter()
            .map(|dir| Utf8PathBuf::from(dir.path))
            .collect();
        self
    }
}

/// Enumerate candidate artifacts for every enabled source.
pub fn discover(config: &SourceConfig, cache: &CacheStore) -> Vec<Candidate> {
    tracing::info!("scanning for games");

    let mut data: Vec<Candidate> = Vec::new();

    // User custom dirs, priority per directory: RPCS3 first, then
    // emulator-style records, else the generic appid-folder search below.
    let mut additional_search: Vec<Utf8PathBuf> = Vec::new();
    for dir in &config.user_dirs {
        tracing::debug!("[userdir] {dir}");

        if config.rpcs3 {
            let trophies = rpcs3::scan(dir);
            if !trophies.is_empty() {
                data.extend(trophies);
                continue;
            }
        }
        if config.steam_emu {
            let emu = user_dir::scan(dir);
            if emu.is_empty() {
                additional_search.push(dir.clone());
            } else {
                data.extend(emu);
            }
        }
    }

    if config.steam_emu {
        match steam_emu::scan(&additional_search) {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("steam emu scan failed: {err}"),
        }
    }

    if config.green_luma {
        match greenluma::scan() {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("GreenLuma scan failed: {err}"),
        }
    }

    if config.legit_steam != SteamListing::Off {
        match steam::scan_legit(config.legit_steam, config.steam_account_filter.as_deref()) {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("legit Steam scan failed: {err}"),
        }
    }

    if config.luma_play {
        match uplay::scan() {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("LumaPlay scan failed: {err}"),
        }
    }

    if config.gog {
        match gog::scan(cache) {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("GOG scan failed: {err}"),
        }
    }

    if config.epic {
        match epic::scan(cache) {
            Ok(found) => data.extend(found),
            Err(err) => tracing::error!("Epic scan failed: {err}"),
        }
    }

    if config.import_cache {
        data.extend(watchdog::scan(cache));
    }

    // Appid blacklisting.
    match Blacklist::new(cache.exclusion_path()).get() {
        Ok(exclude) => {
            data.retain(|candidate| !blacklist::is_excluded(&exclude, &candidate.appid));
        }
        Err(err) => tracing::error!("could not load exclusion list: {err}"),
    }

    data
}
