//! Core types shared by every part of the loader.
//!
//! - [`Version`]: parsed, totally ordered library version
//! - [`Location`]: the abstract places a library is searched for, in priority order
//! - [`DataModel`]: 32- or 64-bit process word size
//! - [`LibraryError`], [`FailCause`]: the failure taxonomy of a load attempt
//!
//! ## Version strings
//!
//! | Input        | Parsed as          |
//! |--------------|--------------------|
//! | `2.9`        | 2.9.0 (final)      |
//! | `2.9.1-rc2`  | 2.9.1 rc, rev 2    |
//! | `2.9.1a1`    | 2.9.1 alpha, rev 1 |
//! | `.5`         | 0.5.0 (final)      |
//!
//! Two versions are compatible when they share the same major number.

pub mod error;
pub mod types;
pub mod version;

pub use error::{FailCause, LibraryError};
pub use types::{DataModel, Location};
pub use version::{Stage, Version};
