use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::settings::{LoaderConfig, LogLevel};
use crate::core::types::Location;

/// Config file name under the NCBI home directory
pub const CONFIG_FILE_NAME: &str = "ngs-loader.ini";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("malformed override '{0}', expected key=value")]
    MalformedOverride(String),
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(invalid(key, value, "expected a positive number of seconds")),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl LoaderConfig {
    /// Apply one `section.key = value` setting.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the value does not parse.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "loadLibrary.mode" => {
                self.force_simple_load = match value.trim().to_lowercase().as_str() {
                    "simple" => true,
                    "" | "normal" | "full" => false,
                    _ => return Err(invalid(key, value, "expected 'simple' or 'normal'")),
                };
            }
            "loadLibrary.noDownload" => self.disable_download = parse_bool(key, value)?,
            "loadLibrary.noSearch" => self.disable_search = parse_bool(key, value)?,
            "loadLibrary.deleteLibraries" => self.delete_libraries = parse_bool(key, value)?,
            "loadLibrary.locationOrder" => {
                let codes = value.trim();
                self.location_order = if codes.is_empty() {
                    None
                } else {
                    Some(Location::parse_order(codes).ok_or_else(|| {
                        invalid(key, value, "expected location codes from C N L J P W T D")
                    })?)
                };
            }
            "remoteService.endpointOverride" => {
                if let Some(endpoint) = non_empty(value) {
                    self.endpoint = endpoint;
                }
            }
            "remoteService.timeoutSeconds" => self.remote_timeout = parse_seconds(key, value)?,
            "probe.executable" => self.probe_executable = non_empty(value).map(PathBuf::from),
            "probe.timeoutSeconds" => self.probe_timeout = parse_seconds(key, value)?,
            "install.artifact" => {
                if let Some(artifact) = non_empty(value) {
                    self.install_artifact = artifact;
                }
            }
            "logging.level" => {
                self.log_level = value
                    .parse::<LogLevel>()
                    .map_err(|reason| invalid(key, value, &reason))?;
            }
            _ => debug!("Ignoring unknown setting {}", key),
        }
        Ok(())
    }

    /// Overlay every setting of an INI document; the section is the key prefix.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value.
    pub fn apply_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        for (section, properties) in ini.iter() {
            for (name, value) in properties.iter() {
                let key = match section {
                    Some(section) => format!("{section}.{name}"),
                    None => name.to_string(),
                };
                self.apply(&key, value)?;
            }
        }
        Ok(())
    }

    /// Apply `key=value` overrides in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedOverride` for entries without `=`.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<(), ConfigError> {
        for entry in overrides {
            let entry = entry.as_ref();
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedOverride(entry.to_string()))?;
            self.apply(key.trim(), value)?;
        }
        Ok(())
    }
}

/// Default config file location, `~/.ncbi/ngs-loader.ini`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ncbi").join(CONFIG_FILE_NAME))
}

/// Build the configuration from defaults, a config file and overrides.
///
/// An explicit `path` must exist; the default file is optional.
///
/// # Errors
///
/// Returns an error when the file cannot be parsed or a value is invalid.
pub fn load_config<S: AsRef<str>>(
    path: Option<&Path>,
    overrides: &[S],
) -> Result<LoaderConfig, ConfigError> {
    let mut config = LoaderConfig::default();

    let file = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    if let Some(file) = file {
        debug!("Reading configuration from {}", file.display());
        let ini = Ini::load_from_file(&file).map_err(|source| ConfigError::Read {
            path: file.clone(),
            source,
        })?;
        config.apply_ini(&ini)?;
    }

    config.apply_overrides(overrides)?;
    Ok(config)
}
