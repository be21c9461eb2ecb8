//! From discovered candidates to merged per-game states.
//!
//! [`decode_artifact`] turns one [`Candidate`] into a raw record set by
//! dispatching on its descriptor; [`build_game_list`] runs the whole pass:
//! schema lookup, artifact decode and merge for every candidate, in
//! discovery order. Artifact-level failures are absorbed (a corrupt file or
//! an empty registry key must never take down the scan); only a missing
//! schema removes a candidate from the result.

use aw_discovery::{registry_record, ArtifactDescriptor, Candidate};
use aw_schema::{CacheStore, SchemaFetcher, SchemaProvider};
use aw_stats::{decode_dir, json, trophy, DecodeError, RawStatRecord};
use tracing::{debug, info, warn};

use crate::{merge, GameAchievementState, ReconcileOptions, Result};

/// Decode the artifact behind one candidate into a raw record set.
pub fn decode_artifact(
    cache: &CacheStore,
    candidate: &Candidate,
) -> aw_stats::Result<RawStatRecord> {
    match &candidate.artifact {
        ArtifactDescriptor::Dir(dir) => decode_dir(dir),
        ArtifactDescriptor::TrophyFile(path) => {
            let bytes = std::fs::read(path.as_std_path())?;
            trophy::decode_trophies(&bytes)
        }
        ArtifactDescriptor::Registry { hive, key } => Ok(registry_record(hive, key)),
        ArtifactDescriptor::SteamUserStats { user } => {
            let path = cache.user_stats_path(user, &candidate.appid);
            if !path.as_std_path().exists() {
                return Err(DecodeError::NoArtifact(path));
            }
            let text = std::fs::read_to_string(path.as_std_path())?;
            json::decode_json(&text)
        }
        ArtifactDescriptor::Cached => {
            let path = cache.data_path(&candidate.appid);
            if !path.as_std_path().exists() {
                return Err(DecodeError::NoArtifact(path));
            }
            let text = std::fs::read_to_string(path.as_std_path())?;
            json::decode_json(&text)
        }
    }
}

/// Merged state for one appid from an explicit candidate list.
///
/// Candidates for other appids are ignored. Fails only when no schema can
/// be produced for the appid.
pub fn achievements_for_appid<F: SchemaFetcher>(
    provider: &SchemaProvider<F>,
    appid: &str,
    candidates: &[Candidate],
    options: &ReconcileOptions,
) -> Result<GameAchievementState> {
    let schema = provider.get_schema(appid, &options.lang)?;
    let mut state = GameAchievementState::fresh(&schema);

    for candidate in candidates.iter().filter(|c| c.appid == appid) {
        match decode_artifact(provider.cache(), candidate) {
            Ok(record) => merge::apply_record_set(&mut state, &record, options),
            Err(err) if err.is_not_found() => {
                debug!(appid, "no artifact for candidate: {err}");
            }
            Err(err) => warn!(appid, "could not decode artifact: {err}"),
        }
    }

    Ok(state)
}

/// Run the full merge pass over every discovered candidate.
///
/// Candidates are processed in discovery order. With duplicate-merging on,
/// all candidates sharing an appid feed one accumulator and the result
/// carries no source label; with it off, every candidate yields its own
/// state tagged with the candidate's source. `progress` is called after
/// each candidate with `(done, total)`.
pub fn build_game_list<F: SchemaFetcher>(
    provider: &SchemaProvider<F>,
    candidates: &[Candidate],
    options: &ReconcileOptions,
    mut progress: impl FnMut(usize, usize),
) -> Vec<GameAchievementState> {
    info!(count = candidates.len(), "merging discovered candidates");

    let mut games: Vec<GameAchievementState> = Vec::new();

    for (done, candidate) in candidates.iter().enumerate() {
        let slot = if options.merge_duplicates {
            games.iter().position(|g| g.appid == candidate.appid)
        } else {
            None
        };

        let slot = match slot {
            Some(idx) => Some(idx),
            None => match provider.get_schema(&candidate.appid, &options.lang) {
                Ok(schema) => {
                    let mut state = GameAchievementState::fresh(&schema);
                    if !options.merge_duplicates {
                        state.source = candidate.source.clone();
                    }
                    games.push(state);
                    Some(games.len() - 1)
                }
                Err(err) => {
                    warn!(appid = %candidate.appid, "no schema, skipping: {err}");
                    None
                }
            },
        };

        if let Some(idx) = slot {
            match decode_artifact(provider.cache(), candidate) {
                Ok(record) => merge::apply_record_set(&mut games[idx], &record, options),
                Err(err) if err.is_not_found() => {
                    debug!(appid = %candidate.appid, "no artifact: {err}");
                }
                Err(err) => {
                    warn!(appid = %candidate.appid, "could not decode artifact: {err}");
                }
            }
        }

        progress(done + 1, candidates.len());
    }

    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_schema::{GameSchema, SchemaEntry};
    use camino::Utf8PathBuf;
    use std::fs;

    fn cache() -> (tempfile::TempDir, CacheStore) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        (tmp, CacheStore::new(root))
    }

    fn schema(appid: &str, names: &[&str]) -> GameSchema {
        GameSchema {
            name: format!("Game {appid}"),
            appid: appid.into(),
            img: Default::default(),
            achievements: names.iter().map(|n| SchemaEntry::named(*n)).collect(),
        }
    }

    fn provider_for(
        cache: CacheStore,
        schemas: Vec<GameSchema>,
    ) -> SchemaProvider<impl SchemaFetcher> {
        SchemaProvider::new(
            move |appid: &str, _lang: &str| {
                schemas
                    .iter()
                    .find(|s| s.appid == appid)
                    .cloned()
                    .ok_or_else(|| aw_schema::SchemaError::Unavailable {
                        appid: appid.to_string(),
                        reason: "not in fixture".into(),
                    })
            },
            cache,
        )
    }

    fn game_dir(root: &Utf8PathBuf, appid: &str, ini: &str) -> Candidate {
        let dir = root.join(appid);
        fs::create_dir_all(dir.as_std_path()).unwrap();
        fs::write(dir.join("achievements.ini").as_std_path(), ini).unwrap();
        Candidate::new(appid, "Codex", ArtifactDescriptor::Dir(dir))
    }

    #[test]
    fn directory_candidate_decodes_and_merges() {
        let (tmp, cache) = cache();
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("games")).unwrap();
        let candidate = game_dir(
            &root,
            "480",
            "[ACH_WIN]\nAchieved=1\nUnlockTime=1581613000\n[ACH_DIE]\nAchieved=0\n",
        );

        let provider = provider_for(cache, vec![schema("480", &["ACH_WIN", "ACH_DIE"])]);
        let state = achievements_for_appid(
            &provider,
            "480",
            std::slice::from_ref(&candidate),
            &ReconcileOptions::default(),
        )
        .unwrap();

        assert_eq!(state.achievement.unlocked, 1);
        assert!(state.achievement.list[0].achieved);
        assert_eq!(state.achievement.list[0].unlock_time, 1_581_613_000);
    }

    #[test]
    fn cached_candidate_reads_the_data_cache() {
        let (_tmp, cache) = cache();
        cache
            .save_json(
                &cache.data_path("220"),
                &serde_json::json!({"ACH_A": {"achieved": 1, "unlocktime": 42}}),
            )
            .unwrap();
        let candidate = Candidate::new(
            "220",
            "Achievement Watcher : Watchdog",
            ArtifactDescriptor::Cached,
        );

        let provider = provider_for(cache, vec![schema("220", &["ACH_A"])]);
        let state = achievements_for_appid(
            &provider,
            "220",
            std::slice::from_ref(&candidate),
            &ReconcileOptions::default(),
        )
        .unwrap();
        assert!(state.achievement.list[0].achieved);
        assert_eq!(state.achievement.list[0].unlock_time, 42);
    }

    #[test]
    fn steam_user_stats_candidate_reads_the_user_cache() {
        let (_tmp, cache) = cache();
        cache
            .save_json(
                &cache.user_stats_path("76561198000000000", "400"),
                &serde_json::json!([{"name": "ACH_B", "achieved": 1}]),
            )
            .unwrap();
        let candidate = Candidate::new(
            "400",
            "Steam",
            ArtifactDescriptor::SteamUserStats {
                user: "76561198000000000".into(),
            },
        );

        let provider = provider_for(cache, vec![schema("400", &["ACH_B"])]);
        let state = achievements_for_appid(
            &provider,
            "400",
            std::slice::from_ref(&candidate),
            &ReconcileOptions::default(),
        )
        .unwrap();
        assert_eq!(state.achievement.unlocked, 1);
    }

    #[test]
    fn missing_artifact_still_yields_a_valid_state() {
        let (_tmp, cache) = cache();
        let candidate = Candidate::new("300", "Steam", ArtifactDescriptor::Cached);

        let provider = provider_for(cache, vec![schema("300", &["ACH_C", "ACH_D"])]);
        let state = achievements_for_appid(
            &provider,
            "300",
            std::slice::from_ref(&candidate),
            &ReconcileOptions::default(),
        )
        .unwrap();

        // Known game, nothing parseable locally: valid all-unearned state.
        assert_eq!(state.achievement.total, 2);
        assert_eq!(state.achievement.unlocked, 0);
    }

    #[test]
    fn unknown_schema_fails_the_single_appid_lookup() {
        let (_tmp, cache) = cache();
        let provider = provider_for(cache, vec![]);
        assert!(achievements_for_appid(
            &provider,
            "999",
            &[],
            &ReconcileOptions::default()
        )
        .is_err());
    }

    #[test]
    fn duplicate_appids_share_one_accumulator_when_merging() {
        let (tmp, cache) = cache();
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("a")).unwrap();
        let other = Utf8PathBuf::from_path_buf(tmp.path().join("b")).unwrap();
        let one = game_dir(&root, "480", "[ACH_WIN]\nAchieved=1\n");
        let two = game_dir(&other, "480", "[ACH_DIE]\nAchieved=1\n");

        let provider = provider_for(cache, vec![schema("480", &["ACH_WIN", "ACH_DIE"])]);
        let games = build_game_list(
            &provider,
            &[one, two],
            &ReconcileOptions::default(),
            |_, _| {},
        );

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].achievement.unlocked, 2);
        assert!(games[0].source.is_none());
    }

    #[test]
    fn duplicate_appids_stay_separate_when_merging_is_off() {
        let (tmp, cache) = cache();
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("a")).unwrap();
        let other = Utf8PathBuf::from_path_buf(tmp.path().join("b")).unwrap();
        let one = game_dir(&root, "480", "[ACH_WIN]\nAchieved=1\n");
        let two = game_dir(&other, "480", "[ACH_DIE]\nAchieved=1\n");

        let provider = provider_for(cache, vec![schema("480", &["ACH_WIN", "ACH_DIE"])]);
        let options = ReconcileOptions {
            merge_duplicates: false,
            ..Default::default()
        };
        let games = build_game_list(&provider, &[one, two], &options, |_, _| {});

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].achievement.unlocked, 1);
        assert_eq!(games[1].achievement.unlocked, 1);
        assert_eq!(games[0].source.as_deref(), Some("Codex"));
    }

    #[test]
    fn unknown_games_are_skipped_not_fatal() {
        let (tmp, cache) = cache();
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("a")).unwrap();
        let known = game_dir(&root, "480", "[ACH_WIN]\nAchieved=1\n");
        let unknown = game_dir(&root, "999", "[ACH_X]\nAchieved=1\n");

        let provider = provider_for(cache, vec![schema("480", &["ACH_WIN"])]);
        let games = build_game_list(
            &provider,
            &[unknown, known],
            &ReconcileOptions::default(),
            |_, _| {},
        );

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].appid, "480");
    }

    #[test]
    fn progress_is_reported_per_candidate() {
        let (tmp, cache) = cache();
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("a")).unwrap();
        let one = game_dir(&root, "480", "[ACH_WIN]\nAchieved=1\n");
        let two = game_dir(&root, "999", "[ACH_X]\nAchieved=1\n");

        let provider = provider_for(cache, vec![schema("480", &["ACH_WIN"])]);
        let mut seen = Vec::new();
        build_game_list(
            &provider,
            &[one, two],
            &ReconcileOptions::default(),
            |done, total| seen.push((done, total)),
        );
        // Reported for every candidate, including skipped ones.
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }
}
