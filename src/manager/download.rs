use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use super::engine::LibraryManager;
use crate::core::types::{DataModel, Location};
use crate::locate::paths::CandidatePaths;
use crate::locate::platform::{map_library_name, platform_file_name};
use crate::locate::SearchEnv;
use crate::remote::{DownloadRequest, DownloadResult, FileCreator};

/// Picks where a downloaded library is written.
///
/// The NCBI home library directory is tried first (created when missing,
/// plain platform file name), then the directories of every active location
/// with the data-model-aware names. An existing file is moved aside to
/// `<name>.bak`.
pub struct LibraryFileCreator<'a> {
    env: &'a SearchEnv,
    model: DataModel,
    locations: Vec<Location>,
    created: Option<PathBuf>,
}

impl<'a> LibraryFileCreator<'a> {
    pub fn new(env: &'a SearchEnv, model: DataModel, locations: Vec<Location>) -> Self {
        Self {
            env,
            model,
            locations,
            created: None,
        }
    }

    /// File written by the last successful download
    #[must_use]
    pub fn created(&self) -> Option<&Path> {
        self.created.as_deref()
    }

    fn targets(&self, library: &str) -> Vec<PathBuf> {
        let home = CandidatePaths::single(
            self.env,
            self.model,
            Location::FilesystemHome,
            vec![platform_file_name(library)],
        )
        .creating_dirs();
        let active = CandidatePaths::new(
            self.env,
            self.model,
            &self.locations,
            map_library_name(library, Some(self.model)),
        )
        .creating_dirs();
        home.chain(active).collect()
    }
}

/// Move an existing `target` out of the way.
fn back_up(target: &Path) {
    let mut backup = target.as_os_str().to_os_string();
    backup.push(".bak");
    let backup = PathBuf::from(backup);

    // rename cannot replace an existing file on windows
    if cfg!(windows) && backup.exists() {
        debug!("Removing stale {}", backup.display());
        if let Err(e) = std::fs::remove_file(&backup) {
            debug!("Cannot remove {}: {}", backup.display(), e);
        }
    }

    trace!("Renaming {} to {}", target.display(), backup.display());
    if let Err(e) = std::fs::rename(target, &backup) {
        warn!(
            "Cannot rename {} to {}: {}",
            target.display(),
            backup.display(),
            e
        );
    }
}

impl FileCreator for LibraryFileCreator<'_> {
    fn create(&mut self, library: &str) -> Option<(PathBuf, File)> {
        self.created = None;
        for target in self.targets(library) {
            debug!("Trying to create {}", target.display());
            if target.exists() {
                back_up(&target);
            }
            match File::create(&target) {
                Ok(file) => {
                    debug!("Opened {}", target.display());
                    self.created = Some(target.clone());
                    return Some((target, file));
                }
                Err(e) => warn!("Cannot open {}: {}", target.display(), e),
            }
        }
        None
    }

    fn done(&mut self, _path: &Path, success: bool) {
        if !success {
            self.created = None;
        }
    }
}

impl LibraryManager {
    /// Download the latest release of `library` and remember where it went.
    pub(super) fn download(&mut self, library: &str) -> DownloadResult {
        let Some(latest) = self.latest_version(library) else {
            debug!("Latest version of {} is unknown", library);
            return DownloadResult::Failed;
        };
        let Some(remote) = self.remote.as_deref() else {
            return DownloadResult::Failed;
        };
        let Some(request) = DownloadRequest::new(library, self.model, &self.os) else {
            warn!("Cannot detect the OS name; {} will not be downloaded", library);
            return DownloadResult::Failed;
        };

        let locations: Vec<Location> = self.locations.iter().map(|l| l.location()).collect();
        let mut creator = LibraryFileCreator::new(&self.env, self.model, locations);
        let result = remote.download(&request, &mut creator);

        if let DownloadResult::Success(path) = &result {
            info!("Downloaded {} {} to {}", library, latest, path.display());
            self.cache.record_saved(library, &latest, path);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_home_library_dir_is_preferred_and_created() {
        let temp = tempfile::tempdir().unwrap();
        let env = SearchEnv::isolated(temp.path()).with_current_dir(temp.path().join("cwd"));
        let mut creator =
            LibraryFileCreator::new(&env, DataModel::Bits64, vec![Location::Cwd]);

        let (path, mut file) = creator.create("ngs-sdk").unwrap();
        file.write_all(b"payload").unwrap();

        let expected = temp
            .path()
            .join(".ncbi")
            .join("lib64")
            .join(platform_file_name("ngs-sdk"));
        assert_eq!(path, expected);
        assert_eq!(creator.created(), Some(expected.as_path()));
    }

    #[test]
    fn test_existing_file_is_backed_up() {
        let temp = tempfile::tempdir().unwrap();
        let env = SearchEnv::isolated(temp.path());
        let lib_dir = temp.path().join(".ncbi").join("lib64");
        std::fs::create_dir_all(&lib_dir).unwrap();
        let existing = lib_dir.join(platform_file_name("ngs-sdk"));
        std::fs::write(&existing, b"old").unwrap();

        let mut creator = LibraryFileCreator::new(&env, DataModel::Bits64, Vec::new());
        let (path, _file) = creator.create("ngs-sdk").unwrap();
        assert_eq!(path, existing);

        let mut backup = existing.into_os_string();
        backup.push(".bak");
        assert_eq!(std::fs::read(PathBuf::from(backup)).unwrap(), b"old");
    }

    #[test]
    fn test_failed_download_forgets_file() {
        let temp = tempfile::tempdir().unwrap();
        let env = SearchEnv::isolated(temp.path());
        let mut creator = LibraryFileCreator::new(&env, DataModel::Bits64, Vec::new());
        let (path, _file) = creator.create("ngs-sdk").unwrap();
        creator.done(&path, false);
        assert_eq!(creator.created(), None);
    }

    #[test]
    fn test_no_writable_location() {
        let env = SearchEnv::default();
        let mut creator = LibraryFileCreator::new(&env, DataModel::Bits64, vec![Location::Cwd]);
        assert!(creator.create("ngs-sdk").is_none());
    }
}
