//! Windows registry access through `reg.exe query`.
//!
//! Several sources anchor their artifacts in the registry (Steam's install
//! path, GreenLuma and LumaPlay unlock state). Shelling out to `reg query`
//! avoids a native registry binding and degrades cleanly: on non-Windows
//! platforms every function returns "not found".
//!
//! Keys are written with forward slashes in the API and converted here.

use std::process::Command;

/// A registry value's data, as far as the scanners care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegValue {
    Sz(String),
    Dword(u32),
}

impl RegValue {
    pub fn as_dword(&self) -> Option<u32> {
        match self {
            RegValue::Dword(d) => Some(*d),
            RegValue::Sz(_) => None,
        }
    }
}

const VALUE_TYPES: &[&str] = &[
    "REG_EXPAND_SZ",
    "REG_MULTI_SZ",
    "REG_DWORD",
    "REG_QWORD",
    "REG_BINARY",
    "REG_SZ",
];

fn query(args: &[&str]) -> Option<String> {
    if cfg!(not(target_os = "windows")) {
        return None;
    }

    let output = Command::new("reg").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn normalize_key(hive: &str, key: &str) -> String {
    format!("{}\\{}", hive, key.replace('/', "\\"))
}

/// Parse one `reg query` output line into `(name, type, data)`.
fn parse_value_line(line: &str) -> Option<(String, &'static str, String)> {
    let trimmed = line.trim();
    for value_type in VALUE_TYPES {
        let marker = format!("    {value_type}    ");
        if let Some(pos) = trimmed.find(&marker) {
            let name = trimmed[..pos].trim().to_string();
            let data = trimmed[pos + marker.len()..].trim().to_string();
            return Some((name, value_type, data));
        }
    }
    None
}

fn decode_value(value_type: &str, data: &str) -> Option<RegValue> {
    match value_type {
        "REG_SZ" => Some(RegValue::Sz(data.to_string())),
        "REG_EXPAND_SZ" => Some(RegValue::Sz(expand_env(data))),
        "REG_DWORD" | "REG_QWORD" => {
            let parsed = if let Some(hex) = data.strip_prefix("0x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                data.parse().ok()?
            };
            Some(RegValue::Dword(parsed))
        }
        _ => None,
    }
}

/// Expand `%VAR%` style environment references (REG_EXPAND_SZ data).
fn expand_env(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut rest = data;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Read a string value (REG_SZ, or REG_EXPAND_SZ with `%VAR%` expansion).
pub fn read_string(hive: &str, key: &str, value_name: &str) -> Option<String> {
    let key = normalize_key(hive, key);
    let stdout = query(&["query", &key, "/v", value_name])?;

    stdout.lines().find_map(|line| {
        let (name, value_type, data) = parse_value_line(line)?;
        if !name.eq_ignore_ascii_case(value_name) {
            return None;
        }
        match decode_value(value_type, &data)? {
            RegValue::Sz(s) => Some(s),
            RegValue::Dword(_) => None,
        }
    })
}

/// Read a DWORD/QWORD value.
pub fn read_dword(hive: &str, key: &str, value_name: &str) -> Option<u32> {
    let key = normalize_key(hive, key);
    let stdout = query(&["query", &key, "/v", value_name])?;

    stdout.lines().find_map(|line| {
        let (name, value_type, data) = parse_value_line(line)?;
        if !name.eq_ignore_ascii_case(value_name) {
            return None;
        }
        decode_value(value_type, &data)?.as_dword()
    })
}

/// Whether a key exists at all.
pub fn key_exists(hive: &str, key: &str) -> bool {
    let key = normalize_key(hive, key);
    query(&["query", &key, "/ve"]).is_some() || query(&["query", &key]).is_some()
}

/// Names of the direct subkeys of `key`.
pub fn list_subkeys(hive: &str, key: &str) -> Vec<String> {
    let full = normalize_key(hive, key);
    let Some(stdout) = query(&["query", &full]) else {
        return Vec::new();
    };

    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim_end();
            // Subkeys are echoed as full paths starting with the hive name.
            if line.starts_with("HKEY_") && line.len() > full.len() {
                line.rsplit('\\').next().map(str::to_string)
            } else {
                None
            }
        })
        .collect()
}

/// All `(name, value)` pairs directly under `key`.
pub fn list_values(hive: &str, key: &str) -> Vec<(String, RegValue)> {
    let full = normalize_key(hive, key);
    let Some(stdout) = query(&["query", &full]) else {
        return Vec::new();
    };

    stdout
        .lines()
        .filter_map(|line| {
            let (name, value_type, data) = parse_value_line(line)?;
            Some((name, decode_value(value_type, &data)?))
        })
        .collect()
}
