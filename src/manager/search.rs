use std::path::PathBuf;

use crate::core::error::FailCause;
use crate::core::types::Location;
use crate::core::version::Version;
use crate::probe::Candidate;

/// How candidates of one active location are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLocation {
    /// The path remembered in the persistent cache
    Cache,
    /// Bare names handed to the platform loader
    SearchPath,
    /// A fresh download from the remote service
    Download,
    /// File names joined onto the location's directories
    Directories(Location),
}

impl SearchLocation {
    #[must_use]
    pub fn for_location(location: Location) -> Self {
        match location {
            Location::Cache => Self::Cache,
            Location::LibrarySearchPath => Self::SearchPath,
            Location::Download => Self::Download,
            other => Self::Directories(other),
        }
    }

    #[must_use]
    pub fn location(self) -> Location {
        match self {
            Self::Cache => Location::Cache,
            Self::SearchPath => Location::LibrarySearchPath,
            Self::Download => Location::Download,
            Self::Directories(location) => location,
        }
    }
}

impl std::fmt::Display for SearchLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location())
    }
}

/// Best candidate seen during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub path: Option<PathBuf>,
    pub location: Option<Location>,
    /// `None` for a downloaded file that never reported a version
    pub version: Option<Version>,
    pub version_fits: bool,
    pub search_path_load: bool,
    /// Accumulated reason why nothing better was found
    pub cause: Option<FailCause>,
}

impl SearchResult {
    /// Offer a validated candidate. Returns true when it became the best.
    ///
    /// The candidate replaces the best when there is none yet, when it fits
    /// and is newer than the best, or when it fits and the best does not.
    pub fn offer(&mut self, candidate: &Candidate, version: Version, fits: bool) -> bool {
        let replace = self.path.is_none()
            || (fits && version.cmp_opt(self.version.as_ref()).is_gt())
            || (fits && !self.version_fits);
        if replace {
            self.path = Some(candidate.path.clone());
            self.location = Some(candidate.location);
            self.version = Some(version);
            self.version_fits = fits;
            self.search_path_load = candidate.search_path_load;
        }
        replace
    }

    /// Record a downloaded file as the best without a known version.
    pub fn force(&mut self, candidate: &Candidate) {
        self.path = Some(candidate.path.clone());
        self.location = Some(candidate.location);
        self.version = None;
        self.version_fits = false;
        self.search_path_load = candidate.search_path_load;
    }

    /// The best candidate, if any
    #[must_use]
    pub fn candidate(&self) -> Option<Candidate> {
        let path = self.path.clone()?;
        let location = self.location?;
        Some(Candidate {
            location,
            path,
            search_path_load: self.search_path_load,
        })
    }

    /// Best version is on the required line and not older
    #[must_use]
    pub fn satisfies(&self, required: &Version) -> bool {
        self.version.as_ref().is_some_and(|v| v.fits(required))
    }
}
