//! The library manager: search, validation, download and load.
//!
//! [`LibraryManager::load_library`] walks the active locations in order,
//! asks the version probe about every candidate, and keeps the best one:
//!
//! 1. a fitting version beats a non-fitting one,
//! 2. among fitting versions the newest wins,
//! 3. ties keep the candidate found first.
//!
//! The sweep stops early once a fitting version is found and either the
//! latest published version is known, or the cache says the installed
//! libraries were scanned less than a week ago.
//!
//! # Example
//!
//! ```no_run
//! use ngs_loader::{LibraryManager, LoaderConfig, Version};
//!
//! let mut manager = LibraryManager::new(LoaderConfig::default())?
//!     .with_required_version("ngs-sdk", Version::new(2, 9, 0));
//! let loaded = manager.load_library("ngs-sdk")?;
//! println!("{} {} from {}", loaded.name, loaded.version, loaded.path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod download;
pub mod engine;
pub mod search;

pub use download::LibraryFileCreator;
pub use engine::{
    CandidateFile, LibraryManager, LoadedLibrary, PurgeReport, LATEST_VERSION_TRUST_DAYS,
    SEARCH_INTERVAL_DAYS,
};
pub use search::{SearchLocation, SearchResult};
