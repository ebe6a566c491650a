//! On-disk cache for API responses, keyed by request URL.
//!
//! Each entry is a JSON file named after the SHA-256 of the URL. Entries
//! that are expired or cannot be read are deleted on lookup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Settings;
use crate::error::{BggError, Result};

/// File extension of cache entries.
const CACHE_EXTENSION: &str = "cache";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    body: String,
}

/// Response cache rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// The cache configured by `settings`, or `None` when caching is disabled.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        settings
            .cache_enabled
            .then(|| Self::new(&settings.cache_dir, settings.cache_ttl))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`.
    ///
    /// # Arguments
    /// * `url` - Full request URL, query included
    ///
    /// # Returns
    /// `<dir>/<sha256 hex of url>.cache`
    #[must_use]
    pub fn path_for(&self, url: &str) -> PathBuf {
        let key = hex::encode(Sha256::digest(url.as_bytes()));
        self.dir.join(format!("{key}.{CACHE_EXTENSION}"))
    }

    /// Cached body for `url`, if present and not expired.
    ///
    /// Lookup never fails: unreadable entries are logged, deleted and
    /// treated as a miss.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<String> {
        let path = self.path_for(url);

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable cache entry");
                remove_entry(&path);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&data) {
            Ok(entry) if entry.url != url => {
                tracing::debug!(url, cached = %entry.url, "Cache key collision");
                None
            }
            Ok(entry) if entry.expires_at <= Utc::now() => {
                tracing::debug!(url, expired_at = %entry.expires_at, "Cache expired");
                remove_entry(&path);
                None
            }
            Ok(entry) => {
                tracing::debug!(url, "Cache hit");
                Some(entry.body)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt cache entry");
                remove_entry(&path);
                None
            }
        }
    }

    /// Store `body` for `url`, expiring after the configured TTL.
    ///
    /// # Errors
    /// Returns `BggError::Cache` if the directory or entry cannot be written.
    pub fn put(&self, url: &str, body: &str) -> Result<()> {
        let path = self.path_for(url);
        let created_at = Utc::now();
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        let entry = CacheEntry {
            url: url.to_string(),
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            body: body.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(|e| cache_error(&self.dir, e))?;
        let json = serde_json::to_string(&entry).map_err(|e| cache_error(&path, e))?;

        // Write then rename so a reader never sees a partial entry
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| cache_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            remove_entry(&tmp);
            cache_error(&path, e)
        })?;

        tracing::debug!(url, path = %path.display(), "Cache set");
        Ok(())
    }

    /// Delete every cache entry.
    ///
    /// # Returns
    /// Number of entries removed. A missing directory counts as empty.
    ///
    /// # Errors
    /// Returns `BggError::Cache` if the directory cannot be listed or an
    /// entry cannot be deleted.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(cache_error(&self.dir, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| cache_error(&self.dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == CACHE_EXTENSION) {
                fs::remove_file(&path).map_err(|e| cache_error(&path, e))?;
                removed += 1;
            }
        }

        tracing::info!(dir = %self.dir.display(), removed, "Cache cleared");
        Ok(removed)
    }
}

fn remove_entry(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), error = %e, "Failed to remove cache entry");
        }
    }
}

fn cache_error(path: &Path, err: impl std::fmt::Display) -> BggError {
    BggError::Cache {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
