//! LumaPlay (uPlay crack) unlock state, stored per game under
//! `HKCU/Software/LumaPlay/<appid>/Achievements` as `name -> DWORD` values.
//! Like GreenLuma, only earned achievements are written.
//!
//! Legit uPlay itself exposed achievements only through the Ubisoft web
//! club, which the original reached with browser automation — out of scope
//! here, so LumaPlay is the only uPlay-family scan.

use crate::{reg, ArtifactDescriptor, Candidate, DiscoveryError, Result};

const ROOT: &str = "Software/LumaPlay";

pub fn scan() -> Result<Vec<Candidate>> {
    if !reg::key_exists("HKCU", ROOT) {
        return Err(DiscoveryError::SourceUnavailable(
            "LumaPlay not found".into(),
        ));
    }

    let data = reg::list_subkeys("HKCU", ROOT)
        .into_iter()
        .filter(|appid| appid.chars().all(|c| c.is_ascii_digit()))
        .map(|appid| {
            let key = format!("{ROOT}/{appid}/Achievements");
            Candidate::new(
                appid,
                "LumaPlay",
                ArtifactDescriptor::Registry {
                    hive: "HKCU".into(),
                    key,
                },
            )
        })
        .collect();

    Ok(data)
}
