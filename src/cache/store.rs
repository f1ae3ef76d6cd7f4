use chrono::{DateTime, TimeDelta, Utc};
use ini::Ini;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::types::DataModel;
use crate::core::version::Version;
use crate::locate::env::SearchEnv;
use crate::locate::platform::create_private_dir;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read cache: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write cache: {0}")]
    WriteError(#[from] std::io::Error),
}

/// File name of the cache under `~/.ncbi`
pub const CACHE_FILE_NAME: &str = "LibManager.properties";

const LOADED: &str = "loaded";
const SAVED: &str = "saved";

/// Per-user record of where libraries were found, between runs.
///
/// Keys are namespaced by process word size, so 32- and 64-bit processes
/// keep separate entries for the same library:
///
/// ```text
/// /dll/ngs-sdk/64/loaded/path=/home/u/.ncbi/lib64/libngs-sdk.so
/// /dll/ngs-sdk/64/loaded/version=2.9.0
/// /dll/ngs-sdk/64/last-search=2026-10-19T08:00:00+00:00
/// /dll/ngs-sdk/64/latest-version/value=2.9.0
/// /dll/ngs-sdk/64/latest-version/updated=2026-10-19T08:00:00+00:00
/// ```
///
/// The cache is an optimization only: read and write failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct LibraryCache {
    path: Option<PathBuf>,
    model: DataModel,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl LibraryCache {
    /// Open the cache at `path`. A missing or unreadable file gives an empty cache.
    pub fn open(path: impl Into<PathBuf>, model: DataModel) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match Self::read_entries(&path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            trace!("Cache {} does not exist yet", path.display());
            BTreeMap::new()
        };

        Self {
            path: Some(path),
            model,
            entries,
            dirty: false,
        }
    }

    /// A cache that is never written to disk
    #[must_use]
    pub fn in_memory(model: DataModel) -> Self {
        Self {
            path: None,
            model,
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    /// `~/.ncbi/LibManager.properties`
    #[must_use]
    pub fn default_path(env: &SearchEnv) -> Option<PathBuf> {
        env.ncbi_home().map(|home| home.join(CACHE_FILE_NAME))
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, CacheError> {
        let ini = Ini::load_from_file(path)?;
        Ok(ini
            .general_section()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn key(&self, library: &str, suffix: &str) -> String {
        format!("/dll/{library}/{}/{suffix}", self.model.bits())
    }

    fn set(&mut self, key: String, value: String) {
        if self.entries.get(&key) != Some(&value) {
            self.entries.insert(key, value);
            self.dirty = true;
        }
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
    }

    /// Path of a `loaded`/`saved` record, dropping the record when half of it is missing.
    fn record_path(&mut self, library: &str, kind: &str) -> Option<PathBuf> {
        let path_key = self.key(library, &format!("{kind}/path"));
        let version_key = self.key(library, &format!("{kind}/version"));

        match (
            self.entries.get(&path_key).cloned(),
            self.entries.contains_key(&version_key),
        ) {
            (Some(path), true) => Some(PathBuf::from(path)),
            (None, false) => None,
            _ => {
                debug!("Dropping incomplete '{}' cache record of {}", kind, library);
                self.remove(&path_key);
                self.remove(&version_key);
                None
            }
        }
    }

    /// Most recently loaded path of `library`, else the most recently downloaded one.
    pub fn get(&mut self, library: &str) -> Option<PathBuf> {
        self.record_path(library, LOADED)
            .or_else(|| self.record_path(library, SAVED))
    }

    /// Version recorded with the last successful load
    #[must_use]
    pub fn loaded_version(&self, library: &str) -> Option<Version> {
        self.entries
            .get(&self.key(library, "loaded/version"))
            .map(|v| Version::parse(v))
    }

    /// Version recorded with the last download
    #[must_use]
    pub fn saved_version(&self, library: &str) -> Option<Version> {
        self.entries
            .get(&self.key(library, "saved/version"))
            .map(|v| Version::parse(v))
    }

    pub fn record_loaded(&mut self, library: &str, version: &Version, path: &Path) {
        self.set(
            self.key(library, "loaded/path"),
            path.display().to_string(),
        );
        self.set(
            self.key(library, "loaded/version"),
            version.to_simple_version(),
        );
    }

    pub fn record_saved(&mut self, library: &str, version: &Version, path: &Path) {
        self.set(self.key(library, "saved/path"), path.display().to_string());
        self.set(
            self.key(library, "saved/version"),
            version.to_simple_version(),
        );
    }

    /// Forget the loaded record and the last search time.
    pub fn record_not_loaded(&mut self, library: &str) {
        for suffix in ["loaded/path", "loaded/version", "last-search"] {
            let key = self.key(library, suffix);
            self.remove(&key);
        }
    }

    pub fn record_last_search(&mut self, library: &str) {
        self.record_last_search_at(library, Utc::now());
    }

    pub fn record_last_search_at(&mut self, library: &str, when: DateTime<Utc>) {
        self.set(self.key(library, "last-search"), when.to_rfc3339());
    }

    #[must_use]
    pub fn last_search(&self, library: &str) -> Option<DateTime<Utc>> {
        self.timestamp(&self.key(library, "last-search"))
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.entries.get(key)?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                debug!("Bad timestamp '{}' at {}: {}", raw, key, e);
                None
            }
        }
    }

    pub fn record_latest_version(&mut self, library: &str, version: &Version) {
        self.record_latest_version_at(library, version, Utc::now());
    }

    pub fn record_latest_version_at(
        &mut self,
        library: &str,
        version: &Version,
        when: DateTime<Utc>,
    ) {
        self.set(
            self.key(library, "latest-version/value"),
            version.to_string(),
        );
        self.set(
            self.key(library, "latest-version/updated"),
            when.to_rfc3339(),
        );
    }

    /// Latest published version, if it was recorded within `trust_window`.
    /// An older record is evicted.
    pub fn latest_version(&mut self, library: &str, trust_window: TimeDelta) -> Option<Version> {
        self.latest_version_as_of(library, trust_window, Utc::now())
    }

    pub fn latest_version_as_of(
        &mut self,
        library: &str,
        trust_window: TimeDelta,
        now: DateTime<Utc>,
    ) -> Option<Version> {
        let value_key = self.key(library, "latest-version/value");
        let updated_key = self.key(library, "latest-version/updated");

        let fresh = self
            .timestamp(&updated_key)
            .is_some_and(|updated| now - updated <= trust_window);
        let value = self.entries.get(&value_key).cloned();

        match value {
            Some(v) if fresh => Some(Version::parse(&v)),
            _ => {
                self.remove(&value_key);
                self.remove(&updated_key);
                None
            }
        }
    }

    /// Write the cache if anything changed since the last write.
    ///
    /// Failures are logged and swallowed.
    pub fn flush_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        let Some(path) = self.path.clone() else {
            self.dirty = false;
            return;
        };

        match self.store(&path) {
            Ok(()) => {
                debug!("Saved cache {}", path.display());
                self.dirty = false;
            }
            Err(e) => warn!("Cannot save cache {}: {}", path.display(), e),
        }
    }

    fn store(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            create_private_dir(parent, true);
        }

        let mut ini = Ini::new();
        {
            let mut section = ini.with_general_section();
            for (key, value) in &self.entries {
                section.set(key.as_str(), value.as_str());
            }
        }
        ini.write_to_file(path)?;
        Ok(())
    }
}
