//! On-disk cache for fetched student results.
//!
//! Each entry is one JSON file named by the SHA-256 of the query key, so
//! concurrent lookups for different students never contend for a file.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging;
use crate::result::StudentResult;
use crate::utils::{json_validator, secure_file};

const ENTRY_EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct CachedResult {
    key: String,
    cached_at: DateTime<Utc>,
    result: StudentResult,
}

/// Time-limited store of [`StudentResult`]s keyed by query.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Cache in the platform cache directory.
    pub fn in_default_dir(ttl: Duration) -> Result<Self> {
        Ok(Self::new(Self::default_cache_dir()?, ttl))
    }

    pub fn default_cache_dir() -> Result<PathBuf> {
        let base = directories::ProjectDirs::from("com", "bteb-results", "bteb-results")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine cache directory"))?;
        Ok(base.cache_dir().join("results"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir
            .join(format!("{}.{ENTRY_EXTENSION}", hex::encode(digest)))
    }

    /// Fresh cached result for `key`, if any. Stale or unreadable entries
    /// count as misses and are removed.
    pub fn get(&self, key: &str) -> Option<StudentResult> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<StudentResult> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(&path).ok()?;

        let entry: CachedResult = match json_validator::deserialize_bounded(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Discarding corrupt cache entry");
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if entry.key != key || self.is_expired(entry.cached_at, now) {
            logging::log_cache_event(key, "stale");
            let _ = fs::remove_file(&path);
            return None;
        }

        logging::log_cache_event(key, "hit");
        Some(entry.result)
    }

    pub fn put(&self, key: &str, result: &StudentResult) -> Result<()> {
        self.put_at(key, result, Utc::now())
    }

    fn put_at(&self, key: &str, result: &StudentResult, now: DateTime<Utc>) -> Result<()> {
        let entry = CachedResult {
            key: key.to_string(),
            cached_at: now,
            result: result.clone(),
        };
        secure_file::write_json_atomic(&self.entry_path(key), &entry)
            .context("Failed to write cache entry")?;
        logging::log_cache_event(key, "store");
        Ok(())
    }

    fn is_expired(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let ttl = ChronoDuration::from_std(self.ttl).unwrap_or(ChronoDuration::MAX);
        now.signed_duration_since(cached_at) > ttl
    }

    /// Remove every cached entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION) {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use tempfile::TempDir;

    fn cache(ttl_secs: u64) -> (TempDir, ResultCache) {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResultCache::new(temp_dir.path().join("results"), Duration::from_secs(ttl_secs));
        (temp_dir, cache)
    }

    #[test]
    fn test_roundtrip() {
        let (_tmp, cache) = cache(300);
        let result = fixtures::sample_result();

        assert!(cache.get("123456|2022|x").is_none());
        cache.put("123456|2022|x", &result).unwrap();
        assert_eq!(cache.get("123456|2022|x"), Some(result));
        assert!(cache.get("123456|2016|x").is_none());
    }

    #[test]
    fn test_expiry() {
        let (_tmp, cache) = cache(300);
        let result = fixtures::sample_result();
        let then = Utc::now() - ChronoDuration::seconds(301);

        cache.put_at("k", &result, then).unwrap();
        assert!(cache.get_at("k", then + ChronoDuration::seconds(299)).is_some());
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_stale_entry_is_removed() {
        let (_tmp, cache) = cache(300);
        let result = fixtures::sample_result();
        let path = cache.entry_path("k");

        cache
            .put_at("k", &result, Utc::now() - ChronoDuration::seconds(600))
            .unwrap();
        assert!(path.exists());

        assert!(cache.get("k").is_none());
        assert!(!path.exists());
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_entry_is_miss_and_removed() {
        let (_tmp, cache) = cache(300);
        let path = cache.entry_path("k");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ nope").unwrap();

        assert!(cache.get("k").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_clear() {
        let (_tmp, cache) = cache(300);
        assert_eq!(cache.clear().unwrap(), 0);

        let result = fixtures::sample_result();
        cache.put("a", &result).unwrap();
        cache.put("b", &result).unwrap();
        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_entry_names_are_hashed() {
        let (_tmp, cache) = cache(300);
        let name = cache
            .entry_path("123456|2022|diploma in engineering")
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(name.len(), 64 + ".json".len());
        assert!(!name.contains('|'));
    }
}
