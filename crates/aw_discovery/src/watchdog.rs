//! Import from the watchdog data cache.
//!
//! The companion watchdog service snapshots merged achievement data as one
//! JSON document per appid in the generic data cache. Those documents are
//! re-imported as candidates so games seen only by the watchdog still show
//! up in the full list.

use crate::{ArtifactDescriptor, Candidate};
use aw_schema::CacheStore;

pub fn scan(cache: &CacheStore) -> Vec<Candidate> {
    cache
        .data_appids()
        .into_iter()
        .map(|appid| {
            Candidate::new(
                appid,
                "Achievement Watcher : Watchdog",
                ArtifactDescriptor::Cached,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn cached_documents_become_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(
            Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap(),
        );
        cache
            .save_json(&cache.data_path("480"), &serde_json::json!({}))
            .unwrap();

        let found = scan(&cache);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appid, "480");
        assert_eq!(found[0].artifact, ArtifactDescriptor::Cached);
    }
}
