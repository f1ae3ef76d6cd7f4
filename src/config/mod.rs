//! Loader configuration.
//!
//! Settings are layered, lowest precedence first:
//!
//! | Source | Example |
//! |--------|---------|
//! | Built-in defaults | every location, downloads on |
//! | `~/.ncbi/ngs-loader.ini` | `[loadLibrary]` `noDownload = true` |
//! | `-D key=value` overrides | `-D loadLibrary.mode=simple` |
//!
//! Recognized keys:
//!
//! | Key | Values |
//! |-----|--------|
//! | `loadLibrary.mode` | `simple` loads by bare name only |
//! | `loadLibrary.noDownload` | `true` disables downloads |
//! | `loadLibrary.noSearch` | `true` limits search to cache, search path, download |
//! | `loadLibrary.locationOrder` | codes, e.g. `CNLJPWTD` |
//! | `loadLibrary.deleteLibraries` | `true` purges found libraries before loading |
//! | `remoteService.endpointOverride` | service URL |
//! | `remoteService.timeoutSeconds` | HTTP timeout |
//! | `probe.executable` | path of `ngs-version-probe` |
//! | `probe.timeoutSeconds` | probe timeout |
//! | `logging.level` | `off`, `warning`, `info`, `fine`, `finer`, `finest` |

pub mod file;
pub mod settings;

pub use file::{default_config_path, load_config, ConfigError, CONFIG_FILE_NAME};
pub use settings::{LoaderConfig, LogLevel};
