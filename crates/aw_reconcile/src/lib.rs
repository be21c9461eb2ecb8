//! Achievement reconciliation engine.
//!
//! Takes the canonical schema for a game plus every raw record set the
//! decoders produced for it and merges them into one authoritative
//! [`GameAchievementState`]: resolved `Achieved`, progress counters and
//! unlock time per achievement, in schema order.
//!
//! The merge is strictly sequential over the record sets in the order
//! discovery supplied them — that ordering decides the documented
//! tie-breaks and is a correctness requirement, not an implementation
//! detail. `Achieved` itself is monotonic: once any artifact reports a key
//! earned, no later artifact can unearn it.
//!
//! Partial or absent local data is never an error here. A known schema with
//! no parseable artifacts reconciles to a valid all-unearned state;
//! "0% unlocked" and "unknown game" are deliberately different outcomes.

use aw_schema::{GameArt, GameSchema, SchemaEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod merge;
pub mod pipeline;

pub use merge::reconcile;
pub use pipeline::{achievements_for_appid, build_game_list, decode_artifact};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that reach the caller of the pipeline entry points.
///
/// Everything artifact-level (missing files, malformed content, keys not in
/// the schema) is logged and absorbed; only schema availability and
/// language validation propagate.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// No schema could be produced — the game is unknown.
    #[error(transparent)]
    Schema(#[from] aw_schema::SchemaError),
}

/// Unlock-time tie-break policy when multiple sources disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMerge {
    /// Keep the smallest nonzero timestamp (default).
    #[default]
    OldestFirst,
    /// Keep the largest timestamp.
    RecentFirst,
}

/// Per-request merge configuration, threaded explicitly into every call.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub lang: String,
    pub time_merge: TimeMerge,
    /// When set, the same appid discovered via several sources shares one
    /// accumulator; when clear, each source yields its own state tagged
    /// with its source label.
    pub merge_duplicates: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        ReconcileOptions {
            lang: "english".into(),
            time_merge: TimeMerge::default(),
            merge_duplicates: true,
        }
    }
}

/// One schema entry plus its resolved local state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedAchievement {
    #[serde(flatten)]
    pub meta: SchemaEntry,
    #[serde(rename = "Achieved")]
    pub achieved: bool,
    #[serde(rename = "CurProgress")]
    pub cur_progress: u32,
    #[serde(rename = "MaxProgress")]
    pub max_progress: u32,
    /// Unix seconds; 0 = unknown.
    #[serde(rename = "UnlockTime")]
    pub unlock_time: u64,
}

impl MergedAchievement {
    fn unearned(meta: SchemaEntry) -> Self {
        MergedAchievement {
            meta,
            achieved: false,
            cur_progress: 0,
            max_progress: 0,
            unlock_time: 0,
        }
    }
}

/// The achievement tally of a merged state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementSet {
    pub total: usize,
    /// Count of list entries with `Achieved == true`; recomputed after
    /// every merge pass, never hand-maintained.
    pub unlocked: usize,
    /// Merged records in schema order.
    pub list: Vec<MergedAchievement>,
}

/// The merged, authoritative per-game result handed to the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameAchievementState {
    pub appid: String,
    pub name: String,
    /// Distribution/crack label; omitted when duplicate-merging collapses
    /// several sources into one state.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    #[serde(default)]
    pub img: GameArt,
    pub achievement: AchievementSet,
}

impl GameAchievementState {
    /// A fresh all-unearned state for a schema.
    pub fn fresh(schema: &GameSchema) -> Self {
        let list: Vec<MergedAchievement> = schema
            .achievements
            .iter()
            .cloned()
            .map(MergedAchievement::unearned)
            .collect();

        GameAchievementState {
            appid: schema.appid.clone(),
            name: schema.name.clone(),
            source: None,
            img: schema.img.clone(),
            achievement: AchievementSet {
                total: list.len(),
                unlocked: 0,
                list,
            },
        }
    }

    /// Recompute the unlocked tally from the list.
    pub fn recount(&mut self) {
        self.achievement.unlocked = self
            .achievement
            .list
            .iter()
            .filter(|a| a.achieved)
            .count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_all_unearned() {
        let schema = GameSchema {
            name: "G".into(),
            appid: "1".into(),
            img: Default::default(),
            achievements: vec![SchemaEntry::named("A"), SchemaEntry::named("B")],
        };
        let state = GameAchievementState::fresh(&schema);
        assert_eq!(state.achievement.total, 2);
        assert_eq!(state.achievement.unlocked, 0);
        assert!(state
            .achievement
            .list
            .iter()
            .all(|a| !a.achieved && a.cur_progress == 0 && a.unlock_time == 0));
    }

    #[test]
    fn merged_state_serializes_with_ui_field_names() {
        let schema = GameSchema {
            name: "G".into(),
            appid: "1".into(),
            img: Default::default(),
            achievements: vec![SchemaEntry::named("A")],
        };
        let state = GameAchievementState::fresh(&schema);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["achievement"]["list"][0]["Achieved"], false);
        assert_eq!(json["achievement"]["list"][0]["name"], "A");
        // `source: None` stays out of the document entirely.
        assert!(json.get("source").is_none());
    }
}
