//! Sectioned `key=value` artifact decoder.
//!
//! This one format tag covers at least five incompatible producers:
//!
//! - CODEX / RUNE / OnlineFix style: one section per achievement with
//!   `Achieved` / `UnlockTime` (and sometimes progress) fields.
//! - Hoodlum: twin `Achievements` / `AchievementsUnlockTimes` sections.
//! - 3DM: twin `State` / `Time` sections; the state value is the bitmask
//!   string `0101` when fully unlocked, the time value is a hex-encoded
//!   little-endian u32.
//! - RLD!: per-achievement sections whose `State`, `CurProgress`,
//!   `MaxProgress` and `Time` values are all hex-encoded little-endian u32s.
//! - Flat `ACHIEVE_DATA`: bare `name=1` pairs.
//!
//! The decoder detects the variant from the section names present, never
//! from the filename. Reserved metadata sections (`SteamAchievements`,
//! `Steam64`, `Steam`) are skipped.

use crate::{RawEntry, RawStatRecord, RawValue, Result};

/// Sections that are bookkeeping, not achievements.
const RESERVED_SECTIONS: &[&str] = &["SteamAchievements", "Steam64", "Steam"];

/// 3DM's "fully unlocked" state bitmask.
const THREEDM_UNLOCKED: &str = "0101";

/// Key under which some emulators nest the flat achievement list.
const ACHIEVE_DATA: &str = "ACHIEVE_DATA";

/// Decode a sectioned `key=value` artifact.
///
/// An artifact that parses to zero entries is a valid result. Only text that
/// cannot be interpreted at all is an error, and the syntax is lenient
/// enough that in practice this decoder fails on I/O, not on content.
pub fn decode_ini(text: &str) -> Result<RawStatRecord> {
    let sections = parse_sections(text);

    // Variant detection by section names.
    let has = |name: &str| sections.iter().any(|(n, _)| n == name);

    if has("Achievements") && has("AchievementsUnlockTimes") {
        return Ok(decode_hoodlum(&sections));
    }
    if has("State") && has("Time") {
        return Ok(decode_3dm(&sections));
    }

    let mut entries = Vec::new();
    for (name, pairs) in &sections {
        if name.is_empty() || name == ACHIEVE_DATA {
            // Flat `name=1` pairs, either at top level or nested.
            for (key, value) in pairs {
                if RESERVED_SECTIONS.contains(&key.as_str()) {
                    continue;
                }
                entries.push(RawEntry {
                    key: key.clone(),
                    scalar: Some(RawValue::Text(value.clone())),
                    ..Default::default()
                });
            }
        } else if !RESERVED_SECTIONS.contains(&name.as_str()) {
            let mut entry = RawEntry::new(name.clone());
            for (key, value) in pairs {
                entry
                    .fields
                    .push((key.clone(), RawValue::Text(value.clone())));
            }
            decode_rld_fields(&mut entry);
            entries.push(entry);
        }
    }

    Ok(RawStatRecord {
        entries,
        earned_only: false,
    })
}

/// Hoodlum: `[Achievements]` holds `name=1` for earned entries and
/// `[AchievementsUnlockTimes]` the matching `name=<unix seconds>` pairs.
/// Only earned entries are ever written.
fn decode_hoodlum(sections: &[(String, Vec<(String, String)>)]) -> RawStatRecord {
    let achievements = section(sections, "Achievements");
    let times = section(sections, "AchievementsUnlockTimes");

    let mut entries = Vec::new();
    for (key, value) in achievements {
        if value != "1" {
            continue;
        }
        let mut entry = RawEntry::new(key.clone()).with_field("Achieved", RawValue::Text("1".into()));
        if let Some((_, time)) = times.iter().find(|(k, _)| k == key) {
            entry
                .fields
                .push(("UnlockTime".into(), RawValue::Text(time.clone())));
        }
        entries.push(entry);
    }

    RawStatRecord {
        entries,
        earned_only: false,
    }
}

/// 3DM: `[State]` maps names to the `0101` bitmask when unlocked and
/// `[Time]` to hex-encoded little-endian u32 unix timestamps.
fn decode_3dm(sections: &[(String, Vec<(String, String)>)]) -> RawStatRecord {
    let states = section(sections, "State");
    let times = section(sections, "Time");

    let mut entries = Vec::new();
    for (key, value) in states {
        if value != THREEDM_UNLOCKED {
            continue;
        }
        let mut entry = RawEntry::new(key.clone()).with_field("Achieved", RawValue::Text("1".into()));
        if let Some(time) = times
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, t)| hex_le_u32(t))
        {
            entry
                .fields
                .push(("UnlockTime".into(), RawValue::Int(i64::from(time))));
        }
        entries.push(entry);
    }

    RawStatRecord {
        entries,
        earned_only: false,
    }
}

/// RLD! sections encode `State`, `CurProgress`, `MaxProgress` and `Time` as
/// hex little-endian u32 strings. The rewrite is all-or-nothing: a section
/// that carries `State` but is missing any of the other three (or any value
/// that is not valid hex) is left untouched, matching the original parser's
/// behavior for non-RLD sections that happen to contain a `State` key.
fn decode_rld_fields(entry: &mut RawEntry) {
    const QUAD: [&str; 4] = ["State", "CurProgress", "MaxProgress", "Time"];

    if entry.field("State").is_none() {
        return;
    }

    let mut decoded = Vec::with_capacity(4);
    for name in QUAD {
        let value = match entry.field(name) {
            Some(RawValue::Text(t)) => t,
            _ => return,
        };
        match hex_le_u32(value) {
            Some(v) => decoded.push((name, v)),
            None => return,
        }
    }

    for (name, value) in decoded {
        for (field_name, field_value) in entry.fields.iter_mut() {
            if field_name == name {
                *field_value = RawValue::Int(i64::from(value));
            }
        }
    }
}

/// Decode a hex string into the little-endian u32 spanned by its first four
/// bytes. Returns `None` for anything shorter or non-hex.
fn hex_le_u32(hex: &str) -> Option<u32> {
    let hex = hex.trim().as_bytes();
    if hex.len() < 8 || !hex[..8].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let mut bytes = [0u8; 4];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let pair = std::str::from_utf8(&hex[i * 2..i * 2 + 2]).ok()?;
        *byte = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(u32::from_le_bytes(bytes))
}

fn section<'s>(
    sections: &'s [(String, Vec<(String, String)>)],
    name: &str,
) -> &'s [(String, String)] {
    sections
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, pairs)| pairs.as_slice())
        .unwrap_or(&[])
}

/// Parse lenient INI syntax into ordered `(section, pairs)` groups.
///
/// Top-level pairs (before any header) land in a section with an empty name.
/// Comment lines start with `;` or `#`. Values keep everything after the
/// first `=`, trimmed, with one layer of surrounding quotes stripped.
fn parse_sections(text: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();
    let mut current = String::new();
    sections.push((current.clone(), Vec::new()));

    for line in text.trim_start_matches('\u{feff}').lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            if !sections.iter().any(|(n, _)| *n == current) {
                sections.push((current.clone(), Vec::new()));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            if let Some((_, pairs)) = sections.iter_mut().find(|(n, _)| *n == current) {
                pairs.push((key.trim().to_string(), value.to_string()));
            }
        }
    }

    sections.retain(|(name, pairs)| !(name.is_empty() && pairs.is_empty()));
    sections
}
