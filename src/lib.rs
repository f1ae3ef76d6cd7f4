//! # ngs-loader
//!
//! Locates, validates, downloads and loads the NGS native libraries
//! (`ngs-sdk`, `ncbi-vdb`).
//!
//! A library may be installed in several places at once, in several
//! versions. `ngs-loader` looks at all of them, keeps the newest copy that
//! is compatible with the required minimum version, and downloads the latest
//! release from NCBI when nothing installed fits.
//!
//! ## Features
//!
//! - **Ordered search**: cache, library search path, `~/.ncbi/lib64`, install
//!   directory, classpath, working directory, temporary directory, download
//! - **Crash isolation**: candidate versions are read by a separate
//!   `ngs-version-probe` process
//! - **Persistent cache**: the last good path and the latest published
//!   version are remembered in `~/.ncbi/LibManager.properties`
//! - **Actionable failures**: every error carries a cause such as
//!   "download disabled" or "binding outdated"
//!
//! ## Example
//!
//! ```rust,no_run
//! use ngs_loader::{LibraryManager, LoaderConfig, Version};
//!
//! let config = LoaderConfig {
//!     disable_download: true,
//!     ..LoaderConfig::default()
//! };
//! let mut manager = LibraryManager::new(config)
//!     .unwrap()
//!     .with_required_version("ngs-sdk", Version::parse("2.9.0"));
//!
//! match manager.load_library("ngs-sdk") {
//!     Ok(lib) => println!("{} {}", lib.path.display(), lib.version),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Versions, locations, errors
//! - [`locate`]: Candidate directory enumeration
//! - [`cache`]: The persistent library cache
//! - [`remote`]: The NCBI version/download service
//! - [`probe`]: Out-of-process version checks
//! - [`native`]: In-process library loading
//! - [`manager`]: The search and load state machine
//! - [`config`]: Layered configuration
//! - [`cli`]: Command-line interface implementation

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod locate;
pub mod manager;
pub mod native;
pub mod probe;
pub mod remote;

// Re-export commonly used types for convenience
pub use cache::LibraryCache;
pub use config::LoaderConfig;
pub use core::error::{FailCause, LibraryError};
pub use core::types::*;
pub use core::version::Version;
pub use manager::{LibraryManager, LoadedLibrary};
