//! Configuration management.

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{SortBy, SortOrder};

/// Environment variable prefix for configuration overrides,
/// e.g. `LISTING_SEARCH_SEARCH__MAX_RESULTS=20`.
pub const ENV_PREFIX: &str = "LISTING_SEARCH";

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "listing-search.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Listing fields searched when a request names none
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Result ordering
    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Cap on returned listings; unlimited when unset
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            max_results: None,
        }
    }
}

fn default_fields() -> Vec<String> {
    vec!["title".to_string(), "text".to_string()]
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `-v`/`-q` is given
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of plain text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("search.fields")
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("listing-search").join("config.toml"))
        .filter(|path| path.is_file())
}
