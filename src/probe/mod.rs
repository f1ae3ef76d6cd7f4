//! Version checks of candidate libraries in a disposable process.
//!
//! Loading a malformed or ABI-incompatible library can crash the process that
//! loads it, so candidates are opened by the small `ngs-version-probe`
//! executable instead. The child prints one sentinel line carrying the
//! library's version (see [`sentinel`]); everything else it writes is noise.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::types::Location;
use crate::core::version::Version;

pub mod sentinel;
pub mod subprocess;

pub use subprocess::SubprocessProbe;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot start the version probe; tried {tried}: {reason}")]
    Spawn { tried: String, reason: String },
}

/// A concrete library to check or load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Where the candidate was found
    pub location: Location,
    /// File path, or bare library name when `search_path_load` is set
    pub path: PathBuf,
    /// Load by bare name through the platform search path
    pub search_path_load: bool,
}

impl Candidate {
    pub fn new(location: Location, path: impl Into<PathBuf>, search_path_load: bool) -> Self {
        Self {
            location,
            path: path.into(),
            search_path_load,
        }
    }
}

/// Reports the version of a candidate library without risking the caller.
pub trait VersionProbe {
    /// Version the candidate reports, `None` when it cannot be loaded or
    /// stays silent.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Spawn` when the probe itself cannot run at all.
    fn probe(&self, library: &str, candidate: &Candidate) -> Result<Option<Version>, ProbeError>;
}
