//! Merge a sequence of raw record sets into one per-game state.
//!
//! Record sets are applied strictly in the order the caller supplies them;
//! the ordering rules below are written with "existing" meaning the value
//! accumulated so far and "incoming" the value from the record set being
//! applied:
//!
//! * `Achieved` is monotonic: once true it never reverts.
//! * `CurProgress` only moves when the incoming value is a real improvement
//!   under the same scale (`MaxProgress` agrees), or fills a zero.
//! * `MaxProgress` is fixed by whichever record set first supplies a
//!   nonzero value.
//! * `UnlockTime` keeps the oldest nonzero timestamp by default, the
//!   newest under [`TimeMerge::RecentFirst`].
//!
//! Entries that match no schema achievement are logged and skipped, never
//! invented.

use aw_stats::{normalize, RawEntry, RawStatRecord};
use tracing::warn;

use crate::{GameAchievementState, GameSchema, MergedAchievement, ReconcileOptions, TimeMerge};

/// Merge `records` into a fresh state for `schema`.
///
/// An empty `records` slice yields a valid all-unearned state.
pub fn reconcile(
    schema: &GameSchema,
    records: &[RawStatRecord],
    options: &ReconcileOptions,
) -> GameAchievementState {
    let mut state = GameAchievementState::fresh(schema);
    for record in records {
        apply_record_set(&mut state, record, options);
    }
    state
}

/// Apply one record set to an accumulated state, in place.
///
/// The unlocked tally is recomputed from the list afterwards, so the state
/// is consistent after every call.
pub fn apply_record_set(
    state: &mut GameAchievementState,
    record: &RawStatRecord,
    options: &ReconcileOptions,
) {
    for entry in &record.entries {
        let Some(slot) = match_entry(&mut state.achievement.list, entry) else {
            warn!(
                appid = %state.appid,
                key = %entry.api_name(),
                "achievement not in schema, skipping"
            );
            continue;
        };
        merge_entry(slot, entry, record.earned_only, options.time_merge);
    }
    state.recount();
}

/// Find the schema slot for a raw entry.
///
/// CRC candidates are tried first (checksum-keyed artifacts carry no name
/// at all); otherwise the entry's api name is matched exactly, then
/// case-insensitively.
fn match_entry<'s>(
    list: &'s mut [MergedAchievement],
    entry: &RawEntry,
) -> Option<&'s mut MergedAchievement> {
    if let Some(crcs) = &entry.crc {
        let idx = list.iter().position(|slot| {
            let digest = format!("{:x}", crc32fast::hash(slot.meta.name.as_bytes()));
            crcs.iter().any(|c| crc_eq(c, &digest))
        });
        if let Some(idx) = idx {
            return Some(&mut list[idx]);
        }
        return None;
    }

    let name = entry.api_name();
    if let Some(idx) = list.iter().position(|slot| slot.meta.name == name) {
        return Some(&mut list[idx]);
    }
    let idx = list
        .iter()
        .position(|slot| slot.meta.name.eq_ignore_ascii_case(name))?;
    Some(&mut list[idx])
}

/// Compare two CRC32 hex digests, tolerating missing leading zeros.
///
/// Some producers print the checksum with `%x`-style formatting and drop
/// leading zeros, so `"00ab12cd"` and `"ab12cd"` name the same digest.
fn crc_eq(a: &str, b: &str) -> bool {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.eq_ignore_ascii_case(b)
}

fn merge_entry(
    slot: &mut MergedAchievement,
    entry: &RawEntry,
    earned_only: bool,
    time_merge: TimeMerge,
) {
    let mut incoming = normalize(entry);
    // Earned-only sources prove the unlock by mere presence of the key.
    if earned_only {
        incoming.achieved = true;
    }

    slot.achieved = slot.achieved || incoming.achieved;

    if slot.max_progress == 0 {
        slot.max_progress = incoming.max_progress;
    }

    let improves = incoming.cur_progress > 0
        && ((slot.cur_progress == 0)
            || (incoming.max_progress == slot.max_progress
                && incoming.cur_progress > slot.cur_progress));
    if improves {
        slot.cur_progress = incoming.cur_progress;
    }

    if incoming.unlock_time > 0 {
        let take = match time_merge {
            TimeMerge::OldestFirst => {
                slot.unlock_time == 0 || incoming.unlock_time < slot.unlock_time
            }
            TimeMerge::RecentFirst => incoming.unlock_time > slot.unlock_time,
        };
        if take {
            slot.unlock_time = incoming.unlock_time;
        }
    }
}
