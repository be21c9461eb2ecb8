//! GreenLuma unlock state lives in the registry: one key per appid under
//! `HKCU/Software/GLR/AppID`, with an `Achievements` subkey whose values map
//! achievement names to a DWORD flag. Only earned achievements are ever
//! written there.

use crate::{reg, ArtifactDescriptor, Candidate, DiscoveryError, Result};

const ROOT: &str = "Software/GLR/AppID";

pub fn scan() -> Result<Vec<Candidate>> {
    if !reg::key_exists("HKCU", ROOT) {
        return Err(DiscoveryError::SourceUnavailable(
            "GreenLuma not found".into(),
        ));
    }

    let data = reg::list_subkeys("HKCU", ROOT)
        .into_iter()
        .filter(|appid| appid.chars().all(|c| c.is_ascii_digit()))
        .map(|appid| {
            let key = format!("{ROOT}/{appid}/Achievements");
            Candidate::new(
                appid,
                "GreenLuma",
                ArtifactDescriptor::Registry {
                    hive: "HKCU".into(),
                    key,
                },
            )
        })
        .collect();

    Ok(data)
}
