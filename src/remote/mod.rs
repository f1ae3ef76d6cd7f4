//! Remote library service: latest-version queries and binary downloads.
//!
//! Both calls are form-encoded HTTP POSTs to one endpoint:
//!
//! ```text
//! cmd=vers&libname=ngs-sdk                          -> "2.10.0"
//! cmd=lib&version=1.0&libname=ngs-sdk&os_name=Linux&bits=64&os_arch=amd64
//!                                                   -> library bytes
//! ```
//!
//! A `412` answer to a download means there is no build for the host's
//! OS/architecture. Transport failures never surface as errors: they become
//! [`DownloadResult::Failed`] or an unknown latest version.

pub mod http;
pub mod request;
pub mod service;

pub use http::{HttpLibraryService, DEFAULT_ENDPOINT};
pub use request::{DownloadRequest, OsInfo};
pub use service::{DownloadResult, FileCreator, RemoteLibraryService};
