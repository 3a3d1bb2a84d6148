/// Application settings
///
/// Loaded once at startup from `settings.toml` in the platform config
/// directory. A missing file means defaults; a file that fails to parse
/// means defaults plus a warning, never a startup failure.
///
/// The directory can be overridden with the `MILEPOST_CONFIG_DIR`
/// environment variable (tests, portable installs).
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "settings.toml";

/// Backend the client talks to when no settings file exists
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Photo grid columns
pub const DEFAULT_GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the profile backend
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Number of columns in the photo grid
    pub grid_columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            grid_columns: DEFAULT_GRID_COLUMNS,
        }
    }
}

/// Where the settings file lives.
fn config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("MILEPOST_CONFIG_DIR") {
        return PathBuf::from(dir).join(CONFIG_FILE);
    }

    let mut path = dirs::config_dir().or_else(dirs::home_dir).unwrap_or_default();
    path.push("milepost");
    path.push(CONFIG_FILE);
    path
}

/// Load settings from the default location.
///
/// Returns the config plus an optional warning describing why a present
/// file was ignored.
pub fn load() -> (Config, Option<String>) {
    load_from_path(&config_path())
}

/// Load settings from an explicit path.
pub fn load_from_path(path: &Path) -> (Config, Option<String>) {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        // No file yet: first run, or the user never customized anything
        Err(_) => return (Config::default(), None),
    };

    match toml::from_str(&contents) {
        Ok(config) => (config, None),
        Err(e) => (
            Config::default(),
            Some(format!("ignoring malformed {}: {}", path.display(), e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let (config, warning) = load_from_path(Path::new("/nonexistent/settings.toml"));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(r#"api_base_url = "https://hobby.example""#).unwrap();
        assert_eq!(config.api_base_url, "https://hobby.example");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.grid_columns, DEFAULT_GRID_COLUMNS);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config {
            api_base_url: "https://hobby.example".to_string(),
            request_timeout_secs: 10,
            grid_columns: 4,
        };

        let serialized = toml::to_string(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, restored);
    }
}
