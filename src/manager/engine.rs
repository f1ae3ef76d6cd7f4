use chrono::{TimeDelta, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use super::search::{SearchLocation, SearchResult};
use crate::cache::LibraryCache;
use crate::config::LoaderConfig;
use crate::core::error::{FailCause, LibraryError, MANUAL_INSTALL_HINT};
use crate::core::types::{DataModel, Location};
use crate::core::version::Version;
use crate::locate::paths::CandidatePaths;
use crate::locate::platform::{map_library_name, name_with_data_model};
use crate::locate::SearchEnv;
use crate::native::{self, LibraryHandle, LibraryLoader, NativeLoader};
use crate::probe::{Candidate, SubprocessProbe, VersionProbe};
use crate::remote::http::RemoteError;
use crate::remote::{DownloadResult, HttpLibraryService, OsInfo, RemoteLibraryService};

/// Days a cached last-search stamp skips the installed-library scan
pub const SEARCH_INTERVAL_DAYS: i64 = 7;

/// Days a cached latest version is trusted before asking the remote service
pub const LATEST_VERSION_TRUST_DAYS: i64 = 7;

/// A library loaded into the current process.
#[derive(Debug)]
pub struct LoadedLibrary {
    pub name: String,
    pub path: PathBuf,
    pub version: Version,
    pub location: Location,
    pub handle: LibraryHandle,
}

/// One candidate file of a library, as listed or purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub location: Location,
    pub path: PathBuf,
    pub exists: bool,
}

/// Outcome of deleting every installed copy of a library.
#[derive(Debug, Default, Serialize)]
pub struct PurgeReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Finds, validates, downloads and loads native libraries.
///
/// Every library is looked up against a minimum version registered with
/// [`LibraryManager::with_required_version`]. The active locations are
/// computed once from the [`LoaderConfig`].
pub struct LibraryManager {
    pub(super) config: LoaderConfig,
    pub(super) env: SearchEnv,
    pub(super) model: DataModel,
    pub(super) os: OsInfo,
    pub(super) locations: Vec<SearchLocation>,
    pub(super) cache: LibraryCache,
    pub(super) remote: Option<Box<dyn RemoteLibraryService>>,
    probe: Box<dyn VersionProbe>,
    loader: Box<dyn LibraryLoader>,
    required: HashMap<String, Version>,
    latest: HashMap<String, Option<Version>>,
    purged: HashSet<String>,
}

impl LibraryManager {
    /// Manager for this process: real environment, on-disk cache, HTTP
    /// service (when downloads are enabled), subprocess probe and native loader.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Http` when the HTTP client cannot be built.
    pub fn new(config: LoaderConfig) -> Result<Self, RemoteError> {
        let env = SearchEnv::from_process().with_install_artifact(config.install_artifact.clone());
        let model = DataModel::detect();

        let cache = match LibraryCache::default_path(&env) {
            Some(path) => LibraryCache::open(path, model),
            None => {
                warn!("Home directory is unknown; library cache is kept in memory");
                LibraryCache::in_memory(model)
            }
        };
        let remote: Option<Box<dyn RemoteLibraryService>> = if config.download_enabled() {
            Some(Box::new(HttpLibraryService::new(
                config.endpoint.clone(),
                config.remote_timeout,
            )?))
        } else {
            None
        };

        Ok(Self::from_parts(config, env, model, OsInfo::detect())
            .with_cache(cache)
            .with_remote(remote))
    }

    /// Manager over explicit parts with an in-memory cache and no remote service.
    #[must_use]
    pub fn from_parts(config: LoaderConfig, env: SearchEnv, model: DataModel, os: OsInfo) -> Self {
        let active = config.active_locations();
        for location in Location::ALL {
            if !active.contains(&location) {
                info!("Location {} is disabled", location);
            }
        }

        let probe = SubprocessProbe::new(config.probe_executable.clone(), config.probe_timeout);
        Self {
            locations: active.into_iter().map(SearchLocation::for_location).collect(),
            config,
            env,
            model,
            os,
            cache: LibraryCache::in_memory(model),
            remote: None,
            probe: Box::new(probe),
            loader: Box::new(NativeLoader),
            required: HashMap::new(),
            latest: HashMap::new(),
            purged: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: LibraryCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: Option<Box<dyn RemoteLibraryService>>) -> Self {
        self.remote = remote;
        self
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Box<dyn VersionProbe>) -> Self {
        self.probe = probe;
        self
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn LibraryLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Register the minimum version of `library`.
    #[must_use]
    pub fn with_required_version(mut self, library: impl Into<String>, version: Version) -> Self {
        self.required.insert(library.into(), version);
        self
    }

    /// Active locations in search order
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        self.locations.iter().map(|l| l.location()).collect()
    }

    #[must_use]
    pub fn cache(&self) -> &LibraryCache {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn cache_active(&self) -> bool {
        self.locations.contains(&SearchLocation::Cache)
    }

    /// Find, load and verify `library`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownLibrary` when no minimum version was
    /// registered, `LibraryError::Probe` when the version probe cannot run,
    /// and `NotFound`, `LoadFailed` or `IncompatibleVersion` otherwise.
    pub fn load_library(&mut self, library: &str) -> Result<LoadedLibrary, LibraryError> {
        let required = self
            .required
            .get(library)
            .copied()
            .ok_or_else(|| LibraryError::UnknownLibrary(library.to_string()))?;

        if self.config.delete_libraries
            && !self.config.force_simple_load
            && self.purged.insert(library.to_string())
        {
            warn!("Deleting all installed {} libraries", library);
            self.delete_libraries(library);
        }

        debug!("Searching for {} library...", library);
        let result = self.search_and_load(library, &required);

        if self.cache_active() {
            match &result {
                Ok(loaded) => {
                    self.cache
                        .record_loaded(library, &loaded.version, &loaded.path);
                    if loaded.location != Location::Cache {
                        self.cache.record_last_search(library);
                    }
                }
                Err(_) => self.cache.record_not_loaded(library),
            }
            self.cache.flush_if_dirty();
        }

        if result.is_err() {
            warn!("Loading of {} library failed", library);
        }
        result
    }

    fn search_and_load(
        &mut self,
        library: &str,
        required: &Version,
    ) -> Result<LoadedLibrary, LibraryError> {
        let found = self.search_library(library, required)?;

        let Some(candidate) = found.candidate() else {
            return Err(LibraryError::NotFound {
                library: library.to_string(),
                message: "No installed library was found".to_string(),
                cause: found.cause,
            });
        };
        let downloaded = candidate.location == Location::Download;
        debug!("Found {} library at {}", library, candidate.path.display());

        info!("Loading {}...", library);
        let handle = self.loader.load(library, &candidate).map_err(|reason| {
            if downloaded {
                LibraryError::LoadFailed {
                    library: library.to_string(),
                    message: format!(
                        "No installed library was found and downloaded library '{}' cannot be loaded",
                        candidate.path.display()
                    ),
                    cause: FailCause::RuntimeLoadError(reason),
                    remediation: Some(MANUAL_INSTALL_HINT.to_string()),
                }
            } else {
                LibraryError::LoadFailed {
                    library: library.to_string(),
                    message: format!("Failed to load found library {}", candidate.path.display()),
                    cause: FailCause::RuntimeLoadError(reason),
                    remediation: None,
                }
            }
        })?;
        debug!("Loaded {} library", library);

        let reported = match handle.library() {
            Some(lib) => native::query_version(lib, library).map(|v| Version::parse(&v)),
            None => self.probe.probe(library, &candidate)?,
        };
        let Some(loaded) = reported else {
            return Err(LibraryError::LoadFailed {
                library: library.to_string(),
                message: "Failed to retrieve loaded library's version".to_string(),
                cause: FailCause::InvalidLibrary,
                remediation: None,
            });
        };

        if !loaded.fits(required) {
            debug!(
                "Library version is not compatible. Required: {} loaded: {}",
                required.to_simple_version(),
                loaded.to_simple_version()
            );
            let cause = match found.cause {
                Some(cause) if !downloaded => cause,
                _ if loaded < *required => FailCause::PrereleaseRequiredLibrary,
                _ => FailCause::OutdatedJar,
            };
            return Err(LibraryError::IncompatibleVersion {
                library: library.to_string(),
                message: "Library is incompatible".to_string(),
                path: candidate.path,
                cause,
            });
        }

        debug!(
            "Library {} was loaded successfully. Version = {}",
            library,
            loaded.to_simple_version()
        );
        Ok(LoadedLibrary {
            name: library.to_string(),
            path: candidate.path,
            version: loaded,
            location: candidate.location,
            handle,
        })
    }

    fn candidates(
        &mut self,
        library: &str,
        location: SearchLocation,
        search_even_after_found: &mut bool,
        cause: &mut Option<FailCause>,
    ) -> Vec<Candidate> {
        match location {
            SearchLocation::SearchPath => {
                let mut names = vec![library.to_string()];
                names.push(name_with_data_model(library, self.model));
                names
                    .into_iter()
                    .map(|name| Candidate::new(Location::LibrarySearchPath, name, true))
                    .collect()
            }
            SearchLocation::Cache => {
                let Some(path) = self.cache.get(library) else {
                    return Vec::new();
                };
                *search_even_after_found = self
                    .cache
                    .last_search(library)
                    .map_or(true, |last| Utc::now() - last > TimeDelta::days(SEARCH_INTERVAL_DAYS));
                let bare = path.to_string_lossy().starts_with(library);
                vec![Candidate::new(Location::Cache, path, bare)]
            }
            SearchLocation::Download => {
                info!("Downloading {} from NCBI...", library);
                match self.download(library) {
                    DownloadResult::Success(path) => {
                        info!("Downloaded {} from NCBI", library);
                        vec![Candidate::new(Location::Download, path, false)]
                    }
                    failed => {
                        warn!("Failed to download {} from NCBI", library);
                        *cause = Some(if failed == DownloadResult::UnsupportedOs {
                            FailCause::UnsupportedArch
                        } else {
                            FailCause::ConnectionProblem
                        });
                        Vec::new()
                    }
                }
            }
            SearchLocation::Directories(location) => {
                let names = map_library_name(library, Some(self.model));
                trace!("{} maps to {:?}", library, names);
                CandidatePaths::single(&self.env, self.model, location, names)
                    .map(|path| Candidate::new(location, path, false))
                    .collect()
            }
        }
    }

    /// Sweep the active locations for the best version of `library`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Probe` when the version probe cannot run.
    pub fn search_library(
        &mut self,
        library: &str,
        required: &Version,
    ) -> Result<SearchResult, LibraryError> {
        let mut result = SearchResult::default();

        for location in self.locations.clone() {
            info!("Checking {} from {}...", library, location);

            let mut search_even_after_found = !self.config.force_simple_load;
            let candidates = self.candidates(
                library,
                location,
                &mut search_even_after_found,
                &mut result.cause,
            );
            if candidates.is_empty() {
                continue;
            }

            let mut found_in_location = false;
            for candidate in &candidates {
                if !candidate.search_path_load && !candidate.path.exists() {
                    trace!("{} does not exist", candidate.path.display());
                    continue;
                }
                let Some(version) = self.probe.probe(library, candidate)? else {
                    continue;
                };
                found_in_location = true;

                let fits = version.fits(required);
                if result.offer(candidate, version, fits) {
                    debug!(
                        "Best {} so far: {} from {}",
                        library,
                        candidate.path.display(),
                        location
                    );
                }
                if result.version_fits && !search_even_after_found {
                    break;
                }
            }

            if location == SearchLocation::Download {
                let downloaded = &candidates[0];
                if !result.version_fits
                    || (!found_in_location && result.path.as_ref() == Some(&downloaded.path))
                {
                    result.force(downloaded);
                }
            }

            let compatible = result
                .version
                .as_ref()
                .is_some_and(|v| v.is_compatible(required));
            if compatible && result.satisfies(required) {
                let latest = self.latest_version(library);
                if latest.is_some() || !search_even_after_found {
                    break;
                }
            }
        }

        if result.cause.is_none() && !self.locations.contains(&SearchLocation::Download) {
            result.cause = Some(FailCause::DownloadDisabled);
        }
        Ok(result)
    }

    /// Latest published version of `library`, memoized for the manager's lifetime.
    pub fn latest_version(&mut self, library: &str) -> Option<Version> {
        if let Some(known) = self.latest.get(library) {
            return *known;
        }

        let mut version = self
            .cache
            .latest_version(library, TimeDelta::days(LATEST_VERSION_TRUST_DAYS));
        match version {
            Some(v) => debug!("Cached latest version of {} = {}", library, v),
            None if self.config.download_enabled() => {
                if let Some(remote) = self.remote.as_deref() {
                    version = remote.latest_version(library).map(|v| Version::parse(&v));
                    if let Some(v) = &version {
                        self.cache.record_latest_version(library, v);
                    }
                }
            }
            None => trace!("Latest version of {} is unknown", library),
        }

        self.latest.insert(library.to_string(), version);
        version
    }

    /// Every candidate file of `library` across the active locations.
    #[must_use]
    pub fn list_candidates(&self, library: &str) -> Vec<CandidateFile> {
        let locations = self.locations();
        let mut paths = CandidatePaths::new(
            &self.env,
            self.model,
            &locations,
            map_library_name(library, Some(self.model)),
        );

        let mut files = Vec::new();
        while let Some(path) = paths.next() {
            let Some(location) = paths.current_location() else {
                continue;
            };
            let exists = path.exists();
            files.push(CandidateFile {
                location,
                path,
                exists,
            });
        }
        files
    }

    /// Delete every existing candidate file of `library`.
    pub fn delete_libraries(&self, library: &str) -> PurgeReport {
        let mut report = PurgeReport::default();
        for file in self.list_candidates(library) {
            // locations may share a directory, so the same file can be listed twice
            if !file.path.exists() {
                continue;
            }
            match std::fs::remove_file(&file.path) {
                Ok(()) => {
                    info!("Deleted {}", file.path.display());
                    report.deleted.push(file.path);
                }
                Err(e) => {
                    warn!("Cannot delete '{}': {}", file.path.display(), e);
                    report.failed.push((file.path, e.to_string()));
                }
            }
        }
        report
    }

    /// Cache path, when the cache is kept on disk
    #[must_use]
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache.path()
    }

    /// Write pending cache changes made outside `load_library`.
    pub fn flush_cache(&mut self) {
        self.cache.flush_if_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedProbe(HashMap<Location, Version>);

    impl VersionProbe for FixedProbe {
        fn probe(
            &self,
            _library: &str,
            candidate: &Candidate,
        ) -> Result<Option<Version>, crate::probe::ProbeError> {
            Ok(self.0.get(&candidate.location).copied())
        }
    }

    struct OkLoader;

    impl LibraryLoader for OkLoader {
        fn load(&self, _library: &str, _candidate: &Candidate) -> Result<LibraryHandle, String> {
            Ok(LibraryHandle::detached())
        }
    }

    struct CountingRemote {
        latest: Option<String>,
        calls: Rc<Cell<usize>>,
    }

    impl RemoteLibraryService for CountingRemote {
        fn latest_version(&self, _library: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.latest.clone()
        }

        fn download(
            &self,
            _request: &crate::remote::DownloadRequest,
            _creator: &mut dyn crate::remote::FileCreator,
        ) -> DownloadResult {
            DownloadResult::Failed
        }
    }

    fn manager(home: &Path, config: LoaderConfig, probe: FixedProbe) -> LibraryManager {
        LibraryManager::from_parts(
            config,
            SearchEnv::isolated(home),
            DataModel::Bits64,
            OsInfo::default(),
        )
        .with_probe(Box::new(probe))
        .with_loader(Box::new(OkLoader))
    }

    #[test]
    fn test_unknown_library_is_a_programmer_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut mgr = manager(temp.path(), LoaderConfig::default(), FixedProbe(HashMap::new()));
        assert!(matches!(
            mgr.load_library("ngs-sdk"),
            Err(LibraryError::UnknownLibrary(_))
        ));
    }

    #[test]
    fn test_search_path_candidate_is_loaded_by_name() {
        let temp = tempfile::tempdir().unwrap();
        let config = LoaderConfig {
            disable_download: true,
            ..LoaderConfig::default()
        };
        let probe = FixedProbe(HashMap::from([(
            Location::LibrarySearchPath,
            Version::new(2, 1, 0),
        )]));
        let mut mgr = manager(temp.path(), config, probe)
            .with_required_version("ngs-sdk", Version::new(2, 0, 0));

        let loaded = mgr.load_library("ngs-sdk").unwrap();
        assert_eq!(loaded.path, PathBuf::from("ngs-sdk"));
        assert_eq!(loaded.location, Location::LibrarySearchPath);
        assert_eq!(loaded.version, Version::new(2, 1, 0));
        assert_eq!(mgr.cache().loaded_version("ngs-sdk"), Some(Version::new(2, 1, 0)));
        assert!(mgr.cache().last_search("ngs-sdk").is_some());
    }

    #[test]
    fn test_nothing_found_without_download() {
        let temp = tempfile::tempdir().unwrap();
        let config = LoaderConfig {
            disable_download: true,
            ..LoaderConfig::default()
        };
        let mut mgr = manager(temp.path(), config, FixedProbe(HashMap::new()))
            .with_required_version("ngs-sdk", Version::new(1, 0, 0));

        let err = mgr.load_library("ngs-sdk").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
        assert_eq!(err.cause(), Some(&FailCause::DownloadDisabled));
    }

    #[test]
    fn test_newer_installed_copy_wins() {
        let temp = tempfile::tempdir().unwrap();
        let cwd = temp.path().join("cwd");
        let scratch = temp.path().join("scratch");
        std::fs::create_dir_all(&cwd).unwrap();
        std::fs::create_dir_all(&scratch).unwrap();
        let file = map_library_name("ngs-sdk", Some(DataModel::Bits64)).remove(0);
        std::fs::write(cwd.join(&file), b"lib").unwrap();
        std::fs::write(scratch.join(&file), b"lib").unwrap();

        let config = LoaderConfig {
            location_order: Some(vec![Location::Cwd, Location::Temp]),
            ..LoaderConfig::default()
        };
        let env = SearchEnv::isolated(temp.path())
            .with_current_dir(&cwd)
            .with_temp_dir(&scratch);
        let probe = FixedProbe(HashMap::from([
            (Location::Cwd, Version::new(1, 2, 0)),
            (Location::Temp, Version::new(1, 4, 0)),
        ]));
        let mut mgr = LibraryManager::from_parts(config, env, DataModel::Bits64, OsInfo::default())
            .with_probe(Box::new(probe))
            .with_loader(Box::new(OkLoader))
            .with_required_version("ngs-sdk", Version::new(1, 0, 0));

        let loaded = mgr.load_library("ngs-sdk").unwrap();
        assert_eq!(loaded.location, Location::Temp);
        assert_eq!(loaded.path, scratch.join(&file));
    }

    #[test]
    fn test_latest_version_is_memoized() {
        let temp = tempfile::tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let remote = CountingRemote {
            latest: None,
            calls: Rc::clone(&calls),
        };
        let mut mgr = manager(temp.path(), LoaderConfig::default(), FixedProbe(HashMap::new()))
            .with_remote(Some(Box::new(remote)));

        assert_eq!(mgr.latest_version("ngs-sdk"), None);
        assert_eq!(mgr.latest_version("ngs-sdk"), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_latest_version_recorded_in_cache() {
        let temp = tempfile::tempdir().unwrap();
        let remote = CountingRemote {
            latest: Some("2.10.1".to_string()),
            calls: Rc::new(Cell::new(0)),
        };
        let mut mgr = manager(temp.path(), LoaderConfig::default(), FixedProbe(HashMap::new()))
            .with_remote(Some(Box::new(remote)));

        assert_eq!(mgr.latest_version("ngs-sdk"), Some(Version::new(2, 10, 1)));
        assert_eq!(
            mgr.cache
                .latest_version("ngs-sdk", TimeDelta::days(LATEST_VERSION_TRUST_DAYS)),
            Some(Version::new(2, 10, 1))
        );
    }

    #[test]
    fn test_list_and_purge() {
        let temp = tempfile::tempdir().unwrap();
        let cwd = temp.path().join("cwd");
        std::fs::create_dir_all(&cwd).unwrap();
        let names = map_library_name("ngs-sdk", Some(DataModel::Bits64));
        std::fs::write(cwd.join(&names[0]), b"lib").unwrap();

        let config = LoaderConfig {
            location_order: Some(vec![Location::Cache, Location::Cwd]),
            ..LoaderConfig::default()
        };
        let mgr = LibraryManager::from_parts(
            config,
            SearchEnv::isolated(temp.path()).with_current_dir(&cwd),
            DataModel::Bits64,
            OsInfo::default(),
        );

        let listed = mgr.list_candidates("ngs-sdk");
        assert_eq!(listed.len(), names.len());
        assert!(listed.iter().all(|f| f.location == Location::Cwd));
        assert_eq!(listed.iter().filter(|f| f.exists).count(), 1);

        let report = mgr.delete_libraries("ngs-sdk");
        assert_eq!(report.deleted, vec![cwd.join(&names[0])]);
        assert!(report.failed.is_empty());
        assert!(!cwd.join(&names[0]).exists());
    }

    #[test]
    fn test_purge_with_shared_directory() {
        let temp = tempfile::tempdir().unwrap();
        let shared = temp.path().join("shared");
        std::fs::create_dir_all(&shared).unwrap();
        let names = map_library_name("ngs-sdk", Some(DataModel::Bits64));
        std::fs::write(shared.join(&names[0]), b"lib").unwrap();

        let config = LoaderConfig {
            location_order: Some(vec![Location::Cwd, Location::Temp]),
            ..LoaderConfig::default()
        };
        let env = SearchEnv::isolated(temp.path())
            .with_current_dir(&shared)
            .with_temp_dir(&shared);
        let mgr = LibraryManager::from_parts(config, env, DataModel::Bits64, OsInfo::default());
        assert_eq!(mgr.list_candidates("ngs-sdk").iter().filter(|f| f.exists).count(), 2);

        let report = mgr.delete_libraries("ngs-sdk");
        assert_eq!(report.deleted, vec![shared.join(&names[0])]);
        assert!(report.failed.is_empty());
    }

    /// Cache entry pointing at a 2.0.0 copy, plus a newer 2.5.0 copy in CWD.
    fn cached_and_newer(home: &Path) -> LibraryManager {
        let cached_dir = home.join("cached");
        let cwd = home.join("cwd");
        std::fs::create_dir_all(&cached_dir).unwrap();
        std::fs::create_dir_all(&cwd).unwrap();
        let file = map_library_name("ngs-sdk", Some(DataModel::Bits64)).remove(0);
        std::fs::write(cached_dir.join(&file), b"lib").unwrap();
        std::fs::write(cwd.join(&file), b"lib").unwrap();

        let config = LoaderConfig {
            disable_download: true,
            location_order: Some(vec![Location::Cache, Location::Cwd]),
            ..LoaderConfig::default()
        };
        let probe = FixedProbe(HashMap::from([
            (Location::Cache, Version::new(2, 0, 0)),
            (Location::Cwd, Version::new(2, 5, 0)),
        ]));
        let mut mgr = LibraryManager::from_parts(
            config,
            SearchEnv::isolated(home).with_current_dir(&cwd),
            DataModel::Bits64,
            OsInfo::default(),
        )
        .with_probe(Box::new(probe))
        .with_loader(Box::new(OkLoader))
        .with_required_version("ngs-sdk", Version::new(2, 0, 0));
        mgr.cache
            .record_loaded("ngs-sdk", &Version::new(2, 0, 0), &cached_dir.join(&file));
        mgr
    }

    #[test]
    fn test_recent_search_stops_at_cache() {
        let temp = tempfile::tempdir().unwrap();
        let mut mgr = cached_and_newer(temp.path());
        mgr.cache
            .record_last_search_at("ngs-sdk", Utc::now() - TimeDelta::days(1));

        let loaded = mgr.load_library("ngs-sdk").unwrap();
        assert_eq!(loaded.location, Location::Cache);
        assert_eq!(loaded.version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_stale_search_rescans_locations() {
        let temp = tempfile::tempdir().unwrap();
        let mut mgr = cached_and_newer(temp.path());
        mgr.cache.record_last_search_at(
            "ngs-sdk",
            Utc::now() - TimeDelta::days(SEARCH_INTERVAL_DAYS + 1),
        );

        let loaded = mgr.load_library("ngs-sdk").unwrap();
        assert_eq!(loaded.location, Location::Cwd);
        assert_eq!(loaded.version, Version::new(2, 5, 0));
    }

    #[test]
    fn test_known_latest_version_stops_sweep() {
        let temp = tempfile::tempdir().unwrap();
        let mut mgr = cached_and_newer(temp.path());
        mgr.cache.record_last_search_at(
            "ngs-sdk",
            Utc::now() - TimeDelta::days(SEARCH_INTERVAL_DAYS + 1),
        );
        mgr.cache
            .record_latest_version("ngs-sdk", &Version::new(2, 0, 0));

        let loaded = mgr.load_library("ngs-sdk").unwrap();
        assert_eq!(loaded.location, Location::Cache);
        assert_eq!(loaded.version, Version::new(2, 0, 0));
    }
}
