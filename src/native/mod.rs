//! Loading native libraries into the current process.
//!
//! A library reports its version through an exported C function named after
//! the library, `ngs-sdk` → `ngs_sdk_version`, returning a NUL-terminated
//! string owned by the library.

use libloading::Library;
use std::ffi::{c_char, CStr, OsString};
use std::path::Path;
use tracing::debug;

use crate::probe::Candidate;

/// Name of the version function exported by `library`.
///
/// ```
/// assert_eq!(ngs_loader::native::version_symbol("ncbi-vdb"), "ncbi_vdb_version");
/// ```
#[must_use]
pub fn version_symbol(library: &str) -> String {
    let mut symbol: String = library
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    symbol.push_str("_version");
    symbol
}

fn load_target(path: &Path, search_path_load: bool) -> OsString {
    if search_path_load {
        // bare name: let the platform loader walk its own search path
        libloading::library_filename(path.as_os_str())
    } else {
        path.as_os_str().to_os_string()
    }
}

/// Open a library by bare name (search path) or by file path.
///
/// # Errors
///
/// Returns the platform loader's error when the library cannot be opened.
pub fn open(path: &Path, search_path_load: bool) -> Result<Library, libloading::Error> {
    let target = load_target(path, search_path_load);
    debug!("Opening {}", target.to_string_lossy());
    // SAFETY: loading runs the library's initializers; callers only open
    // candidates that were first validated in a disposable probe process.
    unsafe { Library::new(target) }
}

/// Ask an opened library for its self-reported version.
#[must_use]
pub fn query_version(lib: &Library, library: &str) -> Option<String> {
    let symbol = version_symbol(library);
    // SAFETY: the version function takes no arguments and returns a pointer
    // to a static NUL-terminated string or null.
    unsafe {
        let func = match lib.get::<unsafe extern "C" fn() -> *const c_char>(symbol.as_bytes()) {
            Ok(f) => f,
            Err(e) => {
                debug!("{} not exported: {}", symbol, e);
                return None;
            }
        };
        let raw = func();
        if raw.is_null() {
            return None;
        }
        CStr::from_ptr(raw)
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// A library kept loaded for the lifetime of the handle.
#[derive(Debug)]
pub struct LibraryHandle {
    library: Option<Library>,
}

impl LibraryHandle {
    #[must_use]
    pub fn new(library: Library) -> Self {
        Self {
            library: Some(library),
        }
    }

    /// A handle not backed by a real library
    #[must_use]
    pub fn detached() -> Self {
        Self { library: None }
    }

    #[must_use]
    pub fn library(&self) -> Option<&Library> {
        self.library.as_ref()
    }
}

/// Loads a chosen candidate into the current process.
pub trait LibraryLoader {
    /// # Errors
    ///
    /// Returns the loader's failure description.
    fn load(&self, library: &str, candidate: &Candidate) -> Result<LibraryHandle, String>;
}

/// [`LibraryLoader`] using the platform dynamic loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLoader;

impl LibraryLoader for NativeLoader {
    fn load(&self, _library: &str, candidate: &Candidate) -> Result<LibraryHandle, String> {
        open(&candidate.path, candidate.search_path_load)
            .map(LibraryHandle::new)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Location;
    use std::path::PathBuf;

    #[test]
    fn test_version_symbol() {
        assert_eq!(version_symbol("ngs-sdk"), "ngs_sdk_version");
        assert_eq!(version_symbol("a.b"), "a_b_version");
    }

    #[test]
    fn test_search_path_target_is_platform_name() {
        let target = load_target(Path::new("ngs-sdk"), true);
        assert_eq!(
            target,
            OsString::from(crate::locate::platform::platform_file_name("ngs-sdk"))
        );
        let direct = load_target(Path::new("/opt/libx.so"), false);
        assert_eq!(direct, OsString::from("/opt/libx.so"));
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let candidate = Candidate {
            location: Location::Cwd,
            path: PathBuf::from("/definitely/not/here/libnothing.so"),
            search_path_load: false,
        };
        assert!(NativeLoader.load("nothing", &candidate).is_err());
    }

    #[test]
    fn test_detached_handle() {
        assert!(LibraryHandle::detached().library().is_none());
    }
}
