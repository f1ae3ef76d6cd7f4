use std::fs::File;
use std::path::{Path, PathBuf};

use super::request::DownloadRequest;

/// Outcome of a binary download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// Payload saved at the given path
    Success(PathBuf),
    /// Transport error, unexpected status, or nowhere to save the payload
    Failed,
    /// The service has no build for this OS/architecture
    UnsupportedOs,
}

/// Supplies the file a downloaded library is written to.
pub trait FileCreator {
    /// Open a destination file for `library`; `None` when no location is writable.
    fn create(&mut self, library: &str) -> Option<(PathBuf, File)>;

    /// Called once the payload has been written (or abandoned).
    fn done(&mut self, _path: &Path, _success: bool) {}
}

/// Remote source of library versions and binaries.
pub trait RemoteLibraryService {
    /// Latest published version of `library`, or `None` when it cannot be determined.
    fn latest_version(&self, library: &str) -> Option<String>;

    /// Download the binary described by `request` into a file from `creator`.
    fn download(&self, request: &DownloadRequest, creator: &mut dyn FileCreator)
        -> DownloadResult;
}
