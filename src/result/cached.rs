use super::provider::{ResultProvider, ResultQuery};
use super::types::StudentResult;
use crate::cache::ResultCache;
use crate::error::Result;

/// Serves repeat lookups from a [`ResultCache`] before asking `inner`.
///
/// Cache problems are logged and otherwise ignored; they never fail a
/// lookup that the inner provider can answer.
pub struct CachedResultProvider<P> {
    inner: P,
    cache: ResultCache,
}

impl<P: ResultProvider> CachedResultProvider<P> {
    pub fn new(inner: P, cache: ResultCache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

impl<P: ResultProvider> ResultProvider for CachedResultProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, query: &ResultQuery) -> Result<StudentResult> {
        let key = query.cache_key();
        if let Some(result) = self.cache.get(&key) {
            return Ok(result);
        }

        let result = self.inner.fetch(query)?;
        if let Err(e) = self.cache.put(&key, &result) {
            tracing::warn!(error = %e, "Could not cache result");
        }
        Ok(result)
    }
}
