//! Candidate location enumeration.
//!
//! Every [`Location`](crate::core::types::Location) except the cache record and
//! the download maps to a list of directories:
//!
//! | Location            | Directories                                        |
//! |---------------------|----------------------------------------------------|
//! | `FilesystemHome`    | `~/.ncbi/lib64` (or `lib32`)                       |
//! | `LibrarySearchPath` | `LD_LIBRARY_PATH` / `DYLD_LIBRARY_PATH` / `PATH`   |
//! | `InstallDir`        | directory of `ngs-java.jar` found on `CLASSPATH`   |
//! | `Classpath`         | `CLASSPATH` entries, files replaced by their parent |
//! | `Cwd`               | working directory                                  |
//! | `Temp`              | `TMPDIR`/`TEMP`/`TMP`/`TEMPDIR`, else `/var/tmp`, `/tmp` |
//!
//! [`CandidatePaths`] joins those directories with the platform file names
//! produced by [`platform::map_library_name`].

pub mod env;
pub mod paths;
pub mod platform;

pub use env::SearchEnv;
pub use paths::CandidatePaths;
