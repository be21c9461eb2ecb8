//! Cache-first schema lookup.

use crate::{validate_language, CacheStore, GameSchema, Result, SchemaError};

/// The out-of-scope network side of schema lookup.
///
/// Implementations fetch the canonical achievement list for an appid in the
/// requested language (Steam Web API, the Epic achievements endpoint, a
/// relay server — the core does not care). Closures implement it directly,
/// which keeps tests free of fixture types.
pub trait SchemaFetcher {
    fn fetch_schema(&self, appid: &str, lang: &str) -> Result<GameSchema>;
}

impl<F> SchemaFetcher for F
where
    F: Fn(&str, &str) -> Result<GameSchema>,
{
    fn fetch_schema(&self, appid: &str, lang: &str) -> Result<GameSchema> {
        self(appid, lang)
    }
}

/// A fetcher for offline use: every lookup is a cache miss that reports
/// the schema unavailable.
pub struct NoFetch;

impl SchemaFetcher for NoFetch {
    fn fetch_schema(&self, appid: &str, _lang: &str) -> Result<GameSchema> {
        Err(SchemaError::Unavailable {
            appid: appid.to_string(),
            reason: "network lookup disabled".into(),
        })
    }
}

/// Cache-first adapter over a [`SchemaFetcher`].
///
/// A cached schema is served indefinitely — there is no staleness check,
/// since achievement definitions are effectively immutable once published.
/// The first successful fetch is written through to the cache; a fetch
/// failure after a cache miss surfaces as [`SchemaError::Unavailable`].
pub struct SchemaProvider<F> {
    fetcher: F,
    cache: CacheStore,
}

impl<F: SchemaFetcher> SchemaProvider<F> {
    pub fn new(fetcher: F, cache: CacheStore) -> Self {
        SchemaProvider { fetcher, cache }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Canonical schema for `appid`, cache-first.
    pub fn get_schema(&self, appid: &str, lang: &str) -> Result<GameSchema> {
        validate_language(lang)?;

        if let Some(cached) = self.cache.load_schema(appid, lang)? {
            return Ok(cached);
        }

        let schema = self.fetcher.fetch_schema(appid, lang)?;
        if let Err(err) = self.cache.save_schema(&schema, lang) {
            // A failed cache write never fails the lookup itself.
            tracing::warn!("could not cache schema for {appid}: {err}");
        }
        Ok(schema)
    }

    /// Local-only lookup for fast paths (overlay refresh). Never touches the
    /// fetcher; `Ok(None)` when nothing is cached.
    pub fn get_cached_only(&self, appid: &str, lang: &str) -> Result<Option<GameSchema>> {
        validate_language(lang)?;
        self.cache.load_schema(appid, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaEntry;
    use camino::Utf8PathBuf;
    use std::cell::Cell;

    fn store() -> (tempfile::TempDir, CacheStore) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        (tmp, CacheStore::new(root))
    }

    fn sample(appid: &str) -> GameSchema {
        GameSchema {
            name: "Game".into(),
            appid: appid.into(),
            img: Default::default(),
            achievements: vec![SchemaEntry::named("ACH_A")],
        }
    }

    #[test]
    fn first_fetch_writes_through_to_cache() {
        let (_tmp, cache) = store();
        let calls = Cell::new(0u32);
        let provider = SchemaProvider::new(
            |appid: &str, _lang: &str| {
                calls.set(calls.get() + 1);
                Ok(sample(appid))
            },
            cache,
        );

        let first = provider.get_schema("480", "english").unwrap();
        let second = provider.get_schema("480", "english").unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1, "second lookup must be served from cache");
    }

    #[test]
    fn invalid_language_fails_before_fetch() {
        let (_tmp, cache) = store();
        let provider = SchemaProvider::new(
            |_: &str, _: &str| -> Result<GameSchema> { panic!("must not be called") },
            cache,
        );
        assert!(matches!(
            provider.get_schema("480", "klingon"),
            Err(SchemaError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn cached_only_never_fetches() {
        let (_tmp, cache) = store();
        cache.save_schema(&sample("480"), "english").unwrap();
        let provider = SchemaProvider::new(NoFetch, cache);

        assert!(provider
            .get_cached_only("480", "english")
            .unwrap()
            .is_some());
        assert!(provider.get_cached_only("481", "english").unwrap().is_none());
    }

    #[test]
    fn miss_with_no_fetch_is_unavailable() {
        let (_tmp, cache) = store();
        let provider = SchemaProvider::new(NoFetch, cache);
        assert!(matches!(
            provider.get_schema("480", "english"),
            Err(SchemaError::Unavailable { .. })
        ));
    }
}
