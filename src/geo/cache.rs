//! On-disk cache for detected locations.
//!
//! Detection runs at most once a day; scheduled runs in between reuse the cached
//! coordinates. A stale entry is still better than the built-in default when
//! detection fails, so it is kept until replaced.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CACHE_FILE_NAME, CACHE_MAX_AGE_SECS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    /// Unix timestamp (seconds) of when the location was detected
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
}

impl CachedLocation {
    pub fn new(latitude: f64, longitude: f64, label: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp(),
            latitude,
            longitude,
            label,
        }
    }

    /// Whether the entry is younger than the maximum cache age.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.timestamp() - self.timestamp;
        (0..CACHE_MAX_AGE_SECS).contains(&age)
    }

    /// Read a cache file.
    ///
    /// # Returns
    /// * `Ok(None)` - If there is no cache file yet
    /// * `Ok(Some(_))` - The cached entry
    /// * `Err(_)` - If the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read location cache {}", path.display()))?;
        let cached = toml::from_str(&content)
            .with_context(|| format!("Failed to parse location cache {}", path.display()))?;
        Ok(Some(cached))
    }

    /// Write the cache file atomically (temp file in the same directory, then rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("Cache path {} has no parent", path.display()))?;
        fs::create_dir_all(parent).context("Failed to create cache directory")?;

        let content = toml::to_string(self).context("Failed to serialize location cache")?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .context("Failed to create temporary cache file")?;
        temp.write_all(content.as_bytes())
            .context("Failed to write temporary cache file")?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write location cache {}", path.display()))?;

        Ok(())
    }
}

/// Default cache location: `$XDG_CACHE_HOME/auto-mode/location.toml`.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_NAME).join(CACHE_FILE_NAME))
}
