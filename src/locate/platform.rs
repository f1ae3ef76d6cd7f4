//! Platform naming of library files and private directory creation.

use std::path::Path;
use tracing::{debug, trace};

use crate::core::types::DataModel;

/// `ngs-sdk` → `ngs-sdk-64`
#[must_use]
pub fn name_with_data_model(library: &str, model: DataModel) -> String {
    format!("{library}-{}", model.bits())
}

/// Platform file name of a library: `libngs-sdk.so`, `libngs-sdk.dylib`, `ngs-sdk.dll`.
#[must_use]
pub fn platform_file_name(library: &str) -> String {
    format!(
        "{}{library}{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

/// Candidate file names for a library, most specific first.
///
/// With a data model, the suffixed name comes before the plain one. On macOS
/// the unprefixed `<name>.dylib` variants are appended as well.
///
/// # Examples
///
/// ```
/// use ngs_loader::core::types::DataModel;
/// use ngs_loader::locate::platform::map_library_name;
///
/// let names = map_library_name("ngs-sdk", Some(DataModel::Bits64));
/// assert_eq!(names.len(), if cfg!(target_os = "macos") { 4 } else { 2 });
/// assert!(names[0].contains("ngs-sdk-64"));
/// ```
#[must_use]
pub fn map_library_name(library: &str, model: Option<DataModel>) -> Vec<String> {
    let with_model = model.map(|m| name_with_data_model(library, m));

    let mut names = Vec::with_capacity(4);
    if let Some(m) = &with_model {
        names.push(platform_file_name(m));
    }
    names.push(platform_file_name(library));

    if cfg!(target_os = "macos") {
        if let Some(m) = &with_model {
            names.push(format!("{m}.dylib"));
        }
        names.push(format!("{library}.dylib"));
    }
    names
}

/// Create `path` (and parents) if missing, readable and writable only by the owner.
///
/// With `closed`, the fresh directory is first shut to everyone and only then
/// opened to the owner, so it is never briefly world-accessible. Failures to
/// adjust permissions are logged; only a failed `mkdir` returns `false`.
pub fn create_private_dir(path: &Path, closed: bool) -> bool {
    if path.exists() {
        return true;
    }

    if let Err(e) = std::fs::create_dir_all(path) {
        debug!("Cannot create {}: {}", path.display(), e);
        return false;
    }
    trace!("Created {}", path.display());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if closed {
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)) {
                debug!("Cannot close {}: {}", path.display(), e);
            }
        }
        if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700)) {
            debug!("Cannot open {} to owner: {}", path.display(), e);
        }
    }
    #[cfg(not(unix))]
    let _ = closed;

    true
}
