//! On-disk cache of successful catalog API responses.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::BggError;

/// Bump when the entry layout changes; older entries are treated as misses.
const CACHE_VERSION: u32 = 1;

/// Default lifetime of a cached response, in hours.
pub const DEFAULT_TTL_HOURS: i64 = 24;

pub fn default_ttl() -> TimeDelta {
    TimeDelta::hours(DEFAULT_TTL_HOURS)
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    version: u32,
    url: String,
    fetched_at: String,
    body: String,
}

/// Response bodies keyed by request URL, one JSON file per entry.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: TimeDelta,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: TimeDelta) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// `<user cache dir>/<project>/bgg`, with the default TTL.
    pub fn for_project(project: &str) -> Result<Self, BggError> {
        let base =
            dirs::cache_dir().ok_or_else(|| BggError::cache("Could not determine cache directory"))?;
        Ok(Self::new(base.join(project).join("bgg"), default_ttl()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached body for `url` if present and not expired.
    ///
    /// Unreadable or corrupt entries count as misses.
    pub fn get(&self, url: &str) -> Result<Option<String>, BggError> {
        self.get_at(url, Utc::now())
    }

    fn get_at(&self, url: &str, now: DateTime<Utc>) -> Result<Option<String>, BggError> {
        let path = self.entry_path(url);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let entry: CachedResponse = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Ignoring corrupt cache entry {}: {e}", path.display());
                return Ok(None);
            }
        };
        if entry.version != CACHE_VERSION || entry.url != url {
            return Ok(None);
        }
        let Ok(fetched_at) = DateTime::parse_from_rfc3339(&entry.fetched_at) else {
            log::warn!("Ignoring cache entry with bad timestamp: {}", path.display());
            return Ok(None);
        };
        if now.signed_duration_since(fetched_at) > self.ttl {
            log::debug!("Cache entry expired: {url}");
            return Ok(None);
        }
        Ok(Some(entry.body))
    }

    /// Store a successful response body.
    pub fn put(&self, url: &str, body: &str) -> Result<(), BggError> {
        self.put_at(url, body, Utc::now())
    }

    fn put_at(&self, url: &str, body: &str, now: DateTime<Utc>) -> Result<(), BggError> {
        fs::create_dir_all(&self.dir)?;
        let entry = CachedResponse {
            version: CACHE_VERSION,
            url: url.to_string(),
            fetched_at: now.to_rfc3339(),
            body: body.to_string(),
        };
        let path = self.entry_path(url);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(&entry)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(url)))
    }
}

/// SHA-256 of the full request URL, hex encoded.
pub fn cache_key(url: &str) -> String {
    Sha256::digest(url.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
