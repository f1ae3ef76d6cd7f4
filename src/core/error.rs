use std::path::PathBuf;
use thiserror::Error;

use crate::probe::ProbeError;

/// Text attached to load failures of a freshly downloaded library
pub const MANUAL_INSTALL_HINT: &str = "Please install ngs and ncbi-vdb manually: \
     https://github.com/ncbi/ngs/wiki/Downloads \
     or write to \"sra-tools@ncbi.nlm.nih.gov\" if problems persist";

/// Why a library could not be found, loaded, or accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailCause {
    /// The remote library service could not be reached
    ConnectionProblem,
    /// Downloads are disabled, so no newer library could be fetched
    DownloadDisabled,
    /// The remote service has no build for this OS/architecture
    UnsupportedArch,
    /// The platform loader rejected the library
    RuntimeLoadError(String),
    /// The library loaded but did not report a version
    InvalidLibrary,
    /// The required minimum version is older than anything compatible that is published
    OutdatedJar,
    /// The required minimum version is newer than anything published
    PrereleaseRequiredLibrary,
}

impl std::fmt::Display for FailCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionProblem => {
                write!(f, "could not connect to NCBI to download the library")
            }
            Self::DownloadDisabled => write!(f, "library download is disabled"),
            Self::UnsupportedArch => {
                write!(f, "no library build is available for this OS and architecture")
            }
            Self::RuntimeLoadError(reason) => write!(f, "the library cannot be loaded: {reason}"),
            Self::InvalidLibrary => write!(f, "the library did not report its version"),
            Self::OutdatedJar => write!(
                f,
                "the binding is outdated and requires an older library; please update it"
            ),
            Self::PrereleaseRequiredLibrary => write!(
                f,
                "the binding requires a library version that is not released yet"
            ),
        }
    }
}

fn with_cause(cause: Option<&FailCause>) -> String {
    cause.map(|c| format!(" ({c})")).unwrap_or_default()
}

fn with_remediation(remediation: Option<&String>) -> String {
    remediation.map(|r| format!(". {r}")).unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Library '{library}' was not found: {message}{}", with_cause(.cause.as_ref()))]
    NotFound {
        library: String,
        message: String,
        cause: Option<FailCause>,
    },

    #[error("Library '{library}' failed to load: {message} ({cause}){}", with_remediation(.remediation.as_ref()))]
    LoadFailed {
        library: String,
        message: String,
        cause: FailCause,
        remediation: Option<String>,
    },

    #[error("Library '{library}' at {} is incompatible: {message} ({cause})", .path.display())]
    IncompatibleVersion {
        library: String,
        message: String,
        path: PathBuf,
        cause: FailCause,
    },

    /// The caller asked for a library that has no minimum version entry
    #[error("Library '{0}' version was not specified")]
    UnknownLibrary(String),

    #[error("Version probe unavailable: {0}")]
    Probe(#[from] ProbeError),
}

impl LibraryError {
    /// Structured cause, when the error carries one
    #[must_use]
    pub fn cause(&self) -> Option<&FailCause> {
        match self {
            Self::NotFound { cause, .. } => cause.as_ref(),
            Self::LoadFailed { cause, .. } | Self::IncompatibleVersion { cause, .. } => Some(cause),
            Self::UnknownLibrary(_) | Self::Probe(_) => None,
        }
    }

    /// Name of the library the error is about
    #[must_use]
    pub fn library(&self) -> Option<&str> {
        match self {
            Self::NotFound { library, .. }
            | Self::LoadFailed { library, .. }
            | Self::IncompatibleVersion { library, .. } => Some(library),
            Self::UnknownLibrary(library) => Some(library),
            Self::Probe(_) => None,
        }
    }
}
