use std::path::PathBuf;

/// File name of the installed binding artifact looked for on the classpath
pub const DEFAULT_INSTALL_ARTIFACT: &str = "ngs-java.jar";

/// Environment variables consulted, in order, for a temporary directory
pub const TEMP_DIR_VARS: [&str; 4] = ["TMPDIR", "TEMP", "TMP", "TEMPDIR"];

/// Conventional temporary directories used when no variable is set
pub const FALLBACK_TEMP_DIRS: [&str; 2] = ["/var/tmp", "/tmp"];

/// Snapshot of the process environment that location enumeration depends on.
///
/// Captured once so a search sees a consistent view, and so tests can point
/// every location at a scratch directory.
#[derive(Debug, Clone, Default)]
pub struct SearchEnv {
    /// Raw `CLASSPATH` list
    pub classpath: Option<String>,
    /// Raw platform library search path list
    pub library_path: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub current_dir: Option<PathBuf>,
    /// First temporary directory named by the environment
    pub temp_dir: Option<PathBuf>,
    /// Candidates checked for existence when `temp_dir` is unset
    pub fallback_temp_dirs: Vec<PathBuf>,
    /// Artifact whose directory is the install location
    pub install_artifact: String,
    /// Separator of `classpath` and `library_path`
    pub path_separator: char,
}

impl SearchEnv {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        let temp_dir = TEMP_DIR_VARS.iter().find_map(|name| {
            let value = std::env::var_os(name)?;
            tracing::trace!("{} = {}", name, value.to_string_lossy());
            Some(PathBuf::from(value))
        });

        Self {
            classpath: std::env::var("CLASSPATH").ok(),
            library_path: std::env::var(library_path_var()).ok(),
            home_dir: dirs::home_dir(),
            current_dir: std::env::current_dir().ok(),
            temp_dir,
            fallback_temp_dirs: FALLBACK_TEMP_DIRS.iter().map(PathBuf::from).collect(),
            install_artifact: DEFAULT_INSTALL_ARTIFACT.to_string(),
            path_separator: path_separator(),
        }
    }

    /// An empty environment rooted at `home`; every other location is unset.
    #[must_use]
    pub fn isolated(home: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: Some(home.into()),
            install_artifact: DEFAULT_INSTALL_ARTIFACT.to_string(),
            path_separator: path_separator(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = Some(classpath.into());
        self
    }

    #[must_use]
    pub fn with_library_path(mut self, library_path: impl Into<String>) -> Self {
        self.library_path = Some(library_path.into());
        self
    }

    #[must_use]
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_fallback_temp_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.fallback_temp_dirs = dirs;
        self
    }

    #[must_use]
    pub fn with_install_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.install_artifact = artifact.into();
        self
    }

    /// `~/.ncbi`
    #[must_use]
    pub fn ncbi_home(&self) -> Option<PathBuf> {
        self.home_dir.as_ref().map(|home| home.join(".ncbi"))
    }
}

/// Variable holding the platform's dynamic library search path
#[must_use]
pub fn library_path_var() -> &'static str {
    if cfg!(windows) {
        "PATH"
    } else if cfg!(target_os = "macos") {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

/// Separator between elements of a path list
#[must_use]
pub fn path_separator() -> char {
    if cfg!(windows) {
        ';'
    } else {
        ':'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_env_only_has_home() {
        let env = SearchEnv::isolated("/home/someone");
        assert_eq!(env.ncbi_home(), Some(PathBuf::from("/home/someone/.ncbi")));
        assert!(env.classpath.is_none());
        assert!(env.temp_dir.is_none());
        assert!(env.fallback_temp_dirs.is_empty());
        assert_eq!(env.install_artifact, DEFAULT_INSTALL_ARTIFACT);
    }

    #[test]
    fn test_builders() {
        let env = SearchEnv::isolated("/h")
            .with_classpath("/a:/b")
            .with_temp_dir("/scratch")
            .with_install_artifact("binding.jar");
        assert_eq!(env.classpath.as_deref(), Some("/a:/b"));
        assert_eq!(env.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(env.install_artifact, "binding.jar");
    }
}
