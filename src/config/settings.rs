use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

use crate::core::types::Location;
use crate::locate::env::DEFAULT_INSTALL_ARTIFACT;
use crate::probe::subprocess::DEFAULT_PROBE_TIMEOUT_SECS;
use crate::remote::http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Verbosity named by `logging.level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    #[default]
    Warning,
    Info,
    Fine,
    Finer,
    Finest,
}

impl LogLevel {
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::OFF,
            Self::Warning => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Fine => LevelFilter::DEBUG,
            Self::Finer | Self::Finest => LevelFilter::TRACE,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "fine" => Ok(Self::Fine),
            "finer" => Ok(Self::Finer),
            "finest" => Ok(Self::Finest),
            other => Err(format!(
                "unknown level '{other}', expected one of: off, warning, info, fine, finer, finest"
            )),
        }
    }
}

/// Settings of the library manager and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Skip search, cache and download; load by bare name only
    pub force_simple_load: bool,
    pub disable_download: bool,
    pub disable_search: bool,
    /// Explicit location order replacing the computed one
    pub location_order: Option<Vec<Location>>,
    /// Delete every library found before loading
    pub delete_libraries: bool,
    pub endpoint: String,
    pub remote_timeout: Duration,
    /// Probe executable tried before the default ones
    pub probe_executable: Option<PathBuf>,
    pub probe_timeout: Duration,
    pub install_artifact: String,
    pub log_level: LogLevel,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            force_simple_load: false,
            disable_download: false,
            disable_search: false,
            location_order: None,
            delete_libraries: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            remote_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_executable: None,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            install_artifact: DEFAULT_INSTALL_ARTIFACT.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl LoaderConfig {
    /// Downloads are attempted
    #[must_use]
    pub fn download_enabled(&self) -> bool {
        !self.force_simple_load && !self.disable_download
    }

    /// Active locations in search order.
    ///
    /// Simple load keeps only the library search path. Otherwise an explicit
    /// order wins; the default order drops `Download` when downloads are
    /// disabled and keeps only cache, search path and download when search is
    /// disabled.
    #[must_use]
    pub fn active_locations(&self) -> Vec<Location> {
        if self.force_simple_load {
            return vec![Location::LibrarySearchPath];
        }

        let base = self
            .location_order
            .clone()
            .unwrap_or_else(|| Location::ALL.to_vec());
        let explicit = self.location_order.is_some();

        let mut active = Vec::with_capacity(base.len());
        for location in base {
            if location == Location::Download && self.disable_download {
                continue;
            }
            if !explicit
                && self.disable_search
                && !matches!(
                    location,
                    Location::Cache | Location::LibrarySearchPath | Location::Download
                )
            {
                continue;
            }
            if !active.contains(&location) {
                active.push(location);
            }
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locations_are_all() {
        let config = LoaderConfig::default();
        assert_eq!(config.active_locations(), Location::ALL.to_vec());
        assert!(config.download_enabled());
    }

    #[test]
    fn test_simple_load_only_search_path() {
        let config = LoaderConfig {
            force_simple_load: true,
            ..LoaderConfig::default()
        };
        assert_eq!(config.active_locations(), vec![Location::LibrarySearchPath]);
        assert!(!config.download_enabled());
    }

    #[test]
    fn test_no_download_drops_download() {
        let config = LoaderConfig {
            disable_download: true,
            ..LoaderConfig::default()
        };
        let active = config.active_locations();
        assert!(!active.contains(&Location::Download));
        assert_eq!(active.len(), Location::ALL.len() - 1);
    }

    #[test]
    fn test_no_search_keeps_cache_search_path_download() {
        let config = LoaderConfig {
            disable_search: true,
            ..LoaderConfig::default()
        };
        assert_eq!(
            config.active_locations(),
            vec![
                Location::Cache,
                Location::LibrarySearchPath,
                Location::Download
            ]
        );

        let config = LoaderConfig {
            disable_search: true,
            disable_download: true,
            ..LoaderConfig::default()
        };
        assert_eq!(
            config.active_locations(),
            vec![Location::Cache, Location::LibrarySearchPath]
        );
    }

    #[test]
    fn test_explicit_order_replaces_default() {
        let config = LoaderConfig {
            location_order: Location::parse_order("TDC"),
            disable_search: true,
            ..LoaderConfig::default()
        };
        assert_eq!(
            config.active_locations(),
            vec![Location::Temp, Location::Download, Location::Cache]
        );

        let config = LoaderConfig {
            location_order: Location::parse_order("DCD"),
            disable_download: true,
            ..LoaderConfig::default()
        };
        assert_eq!(config.active_locations(), vec![Location::Cache]);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!("FINE".parse::<LogLevel>(), Ok(LogLevel::Fine));
        assert_eq!(LogLevel::Fine.level_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Finest.level_filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::Off.level_filter(), LevelFilter::OFF);
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
