use reqwest::StatusCode;
use std::io::{BufWriter, Write};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::request::{version_query_form, DownloadRequest};
use super::service::{DownloadResult, FileCreator, RemoteLibraryService};

/// NCBI toolkit service answering version queries and library downloads
pub const DEFAULT_ENDPOINT: &str = "https://trace.ncbi.nlm.nih.gov/Traces/sratoolkit/sratoolkit.cgi";

/// Default timeout for a single request
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Buffer size used while streaming a payload to disk
const BUF_SZ: usize = 50 * 1024;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Failed to save payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Map a download response status to its outcome
#[must_use]
pub fn classify_status(status: StatusCode) -> Option<DownloadResult> {
    match status {
        StatusCode::OK => None,
        StatusCode::PRECONDITION_FAILED => Some(DownloadResult::UnsupportedOs),
        _ => Some(DownloadResult::Failed),
    }
}

/// [`RemoteLibraryService`] backed by form-encoded HTTP POSTs.
pub struct HttpLibraryService {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpLibraryService {
    /// Create a service talking to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ngs-loader/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query_latest(&self, library: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&version_query_form(library))
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(response.text()?.trim().to_string())
    }

    fn fetch(
        &self,
        request: &DownloadRequest,
        creator: &mut dyn FileCreator,
    ) -> Result<DownloadResult, RemoteError> {
        let mut response = self
            .client
            .post(&self.endpoint)
            .form(&request.form())
            .send()?;

        let status = response.status();
        debug!("Download of {} answered {}", request.library, status);
        if let Some(outcome) = classify_status(status) {
            return Ok(outcome);
        }

        let Some((path, file)) = creator.create(&request.library) else {
            warn!("Cannot find a writable location for {}", request.library);
            return Ok(DownloadResult::Failed);
        };

        let mut writer = BufWriter::with_capacity(BUF_SZ, file);
        let written = response
            .copy_to(&mut writer)
            .map_err(RemoteError::from)
            .and_then(|n| writer.flush().map(|()| n).map_err(RemoteError::from));

        match written {
            Ok(bytes) => {
                info!("Saved {} bytes to {}", bytes, path.display());
                creator.done(&path, true);
                Ok(DownloadResult::Success(path))
            }
            Err(e) => {
                drop(writer);
                creator.done(&path, false);
                if let Err(rm) = std::fs::remove_file(&path) {
                    debug!("Cannot remove partial {}: {}", path.display(), rm);
                }
                Err(e)
            }
        }
    }
}

impl RemoteLibraryService for HttpLibraryService {
    fn latest_version(&self, library: &str) -> Option<String> {
        match self.query_latest(library) {
            Ok(v) if !v.is_empty() => {
                debug!("Latest version of {} is {}", library, v);
                Some(v)
            }
            Ok(_) => {
                warn!("Empty latest version answer for {}", library);
                None
            }
            Err(e) => {
                warn!("Cannot get latest version of {}: {}", library, e);
                None
            }
        }
    }

    fn download(
        &self,
        request: &DownloadRequest,
        creator: &mut dyn FileCreator,
    ) -> DownloadResult {
        match self.fetch(request, creator) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Download of {} failed: {}", request.library, e);
                DownloadResult::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataModel;
    use crate::remote::request::OsInfo;
    use std::fs::File;
    use std::path::{Path, PathBuf};

    struct NeverCreate;

    impl FileCreator for NeverCreate {
        fn create(&mut self, _library: &str) -> Option<(PathBuf, File)> {
            None
        }

        fn done(&mut self, _path: &Path, _success: bool) {
            panic!("nothing was created");
        }
    }

    // port 1 is not listening, so every request fails at the transport level
    fn unreachable() -> HttpLibraryService {
        HttpLibraryService::new("http://127.0.0.1:1/cgi", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(
            classify_status(StatusCode::PRECONDITION_FAILED),
            Some(DownloadResult::UnsupportedOs)
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            Some(DownloadResult::Failed)
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(DownloadResult::Failed)
        );
    }

    #[test]
    fn test_transport_error_is_downgraded() {
        let service = unreachable();
        assert_eq!(service.endpoint(), "http://127.0.0.1:1/cgi");
        assert_eq!(service.latest_version("ngs-sdk"), None);

        let os = OsInfo {
            name: Some("Linux".to_string()),
            arch: None,
            version: None,
        };
        let request = DownloadRequest::new("ngs-sdk", DataModel::Bits64, &os).unwrap();
        assert_eq!(
            service.download(&request, &mut NeverCreate),
            DownloadResult::Failed
        );
    }
}
