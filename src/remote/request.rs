use crate::core::types::DataModel;

/// Version of the download protocol spoken with the toolkit service
pub const PROTOCOL_VERSION: &str = "1.0";

/// Description of the host sent along with a download request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OsInfo {
    pub name: Option<String>,
    pub arch: Option<String>,
    pub version: Option<String>,
}

impl OsInfo {
    /// Describe the running host the way the toolkit service expects it
    /// (`Linux`/`amd64`, `Mac OS X`/`x86_64`, `Windows`/`amd64`).
    #[must_use]
    pub fn detect() -> Self {
        let os = std::env::consts::OS;
        let name = match os {
            "linux" => "Linux".to_string(),
            "macos" => "Mac OS X".to_string(),
            "windows" => "Windows".to_string(),
            "" => String::new(),
            other => other.to_string(),
        };

        let arch = match (std::env::consts::ARCH, os) {
            ("x86_64", "macos") => "x86_64",
            ("x86_64", _) => "amd64",
            (other, _) => other,
        };

        Self {
            name: (!name.is_empty()).then_some(name),
            arch: (!arch.is_empty()).then(|| arch.to_string()),
            version: detect_os_version(),
        }
    }
}

#[cfg(target_os = "linux")]
fn detect_os_version() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn detect_os_version() -> Option<String> {
    None
}

/// Form fields asking for the latest published version of `library`
#[must_use]
pub fn version_query_form(library: &str) -> Vec<(&'static str, String)> {
    vec![("cmd", "vers".to_string()), ("libname", library.to_string())]
}

/// A binary download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub library: String,
    pub os_name: String,
    pub model: DataModel,
    pub os_arch: Option<String>,
    pub os_version: Option<String>,
}

impl DownloadRequest {
    /// Build a request for this host; `None` when the OS name is unknown.
    #[must_use]
    pub fn new(library: &str, model: DataModel, os: &OsInfo) -> Option<Self> {
        Some(Self {
            library: library.to_string(),
            os_name: os.name.clone()?,
            model,
            os_arch: os.arch.clone(),
            os_version: os.version.clone(),
        })
    }

    /// Form fields in protocol order; unknown optional fields are omitted.
    #[must_use]
    pub fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("cmd", "lib".to_string()),
            ("version", PROTOCOL_VERSION.to_string()),
            ("libname", self.library.clone()),
            ("os_name", self.os_name.clone()),
            ("bits", self.model.bits().to_string()),
        ];
        if let Some(arch) = &self.os_arch {
            form.push(("os_arch", arch.clone()));
        }
        if let Some(version) = &self.os_version {
            form.push(("os_version", version.clone()));
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> OsInfo {
        OsInfo {
            name: Some("Linux".to_string()),
            arch: Some("amd64".to_string()),
            version: None,
        }
    }

    #[test]
    fn test_download_form_fields() {
        let request = DownloadRequest::new("ngs-sdk", DataModel::Bits64, &linux()).unwrap();
        assert_eq!(
            request.form(),
            vec![
                ("cmd", "lib".to_string()),
                ("version", "1.0".to_string()),
                ("libname", "ngs-sdk".to_string()),
                ("os_name", "Linux".to_string()),
                ("bits", "64".to_string()),
                ("os_arch", "amd64".to_string()),
            ]
        );
    }

    #[test]
    fn test_os_version_appended_when_known() {
        let mut os = linux();
        os.version = Some("6.1.0".to_string());
        let form = DownloadRequest::new("ncbi-vdb", DataModel::Bits32, &os)
            .unwrap()
            .form();
        assert_eq!(form.last(), Some(&("os_version", "6.1.0".to_string())));
        assert!(form.contains(&("bits", "32".to_string())));
    }

    #[test]
    fn test_missing_os_name_rejects_request() {
        let os = OsInfo::default();
        assert!(DownloadRequest::new("ngs-sdk", DataModel::Bits64, &os).is_none());
    }

    #[test]
    fn test_version_query_form() {
        assert_eq!(
            version_query_form("ngs-sdk"),
            vec![("cmd", "vers".to_string()), ("libname", "ngs-sdk".to_string())]
        );
    }

    #[test]
    fn test_detect_has_os_name() {
        assert!(OsInfo::detect().name.is_some());
    }
}
