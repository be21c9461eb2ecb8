//! Canonical field normalization.
//!
//! The supported artifact producers never agreed on field names: the earned
//! flag alone ships as `Achieved`, `achieved`, `State`, `HaveAchieved`,
//! `Unlocked`, `unlocked` or `earned` depending on the crack group. Rather
//! than scattering `or`-chains through the merge logic, the spelling table
//! lives here as static data and [`normalize`] maps every [`RawEntry`] onto
//! one canonical shape.

use crate::{RawEntry, RawValue};

/// Spellings of the earned flag, in producer priority order.
pub const ACHIEVED_SPELLINGS: &[&str] = &[
    "Achieved",
    "achieved",
    "State",
    "HaveAchieved",
    "Unlocked",
    "unlocked",
    "earned",
];

/// Spellings of the current progress counter.
pub const CUR_PROGRESS_SPELLINGS: &[&str] = &["CurProgress", "progress"];

/// Spellings of the maximum progress counter.
pub const MAX_PROGRESS_SPELLINGS: &[&str] = &["MaxProgress", "max_progress"];

/// Spellings of the unlock timestamp.
pub const UNLOCK_TIME_SPELLINGS: &[&str] = &[
    "UnlockTime",
    "unlocktime",
    "unlock_time",
    "HaveAchievedTime",
    "HaveHaveAchievedTime",
    "Time",
    "earned_time",
];

/// One raw entry reduced to the canonical achievement state shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizedState {
    pub achieved: bool,
    pub cur_progress: u32,
    pub max_progress: u32,
    /// Unix seconds, 0 = unknown.
    pub unlock_time: u64,
}

/// Reduce a raw entry to the canonical shape.
///
/// Applies the spelling table, the truthy-achieved encodings, the 7-digit
/// truncated-timestamp repair, and the progress-equals-max heuristic
/// (an entry with `CurProgress == MaxProgress != 0` but no explicit earned
/// flag is treated as earned — several CODEX titles encode it that way).
pub fn normalize(entry: &RawEntry) -> NormalizedState {
    let mut state = NormalizedState {
        achieved: first_field(entry, ACHIEVED_SPELLINGS)
            .map(RawValue::is_truthy)
            .unwrap_or(false),
        cur_progress: first_field(entry, CUR_PROGRESS_SPELLINGS)
            .map(as_counter)
            .unwrap_or(0),
        max_progress: first_field(entry, MAX_PROGRESS_SPELLINGS)
            .map(as_counter)
            .unwrap_or(0),
        unlock_time: first_field(entry, UNLOCK_TIME_SPELLINGS)
            .map(as_timestamp)
            .unwrap_or(0),
    };

    // Bare `name=1` pairs carry the earned flag as the entry's own value.
    if let Some(scalar) = &entry.scalar {
        state.achieved = state.achieved || scalar.is_truthy();
    }

    if !state.achieved
        && state.max_progress != 0
        && state.cur_progress != 0
        && state.cur_progress == state.max_progress
    {
        state.achieved = true;
    }

    state
}

/// First non-zero-length field matching any spelling, in table order.
///
/// Producer priority order means the table order decides when an artifact
/// carries more than one spelling (it happens: RLD! sections have both
/// `State` and `Time` next to progress fields).
fn first_field<'e>(entry: &'e RawEntry, spellings: &[&str]) -> Option<&'e RawValue> {
    spellings.iter().find_map(|name| entry.field(name))
}

fn as_counter(value: &RawValue) -> u32 {
    match value {
        RawValue::Int(i) => u32::try_from(*i).unwrap_or(0),
        RawValue::Text(t) => t.trim().parse::<u32>().unwrap_or(0),
        RawValue::Bool(_) => 0,
    }
}

/// Parse a timestamp field into unix seconds.
///
/// One producer (CreamAPI) writes a 7-digit truncated timestamp; a value of
/// exactly 7 digits is multiplied by 1000, which restores a plausible
/// seconds-since-epoch magnitude. Detection is by digit length, matching the
/// quirk as observed in the wild.
fn as_timestamp(value: &RawValue) -> u64 {
    let parsed = match value {
        RawValue::Int(i) => u64::try_from(*i).unwrap_or(0),
        RawValue::Text(t) => t.trim().parse::<u64>().unwrap_or(0),
        RawValue::Bool(_) => 0,
    };

    if digit_len(parsed) == 7 {
        parsed * 1000
    } else {
        parsed
    }
}

fn digit_len(mut n: u64) -> u32 {
    if n == 0 {
        return 1;
    }
    let mut len = 0;
    while n > 0 {
        n /= 10;
        len += 1;
    }
    len
}
