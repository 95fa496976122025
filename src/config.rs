use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

use crate::provider::cache::FRESHNESS_WINDOW;
use crate::provider::registries::github::{DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE};

// =============================================================================
// Time-related constants
// =============================================================================

/// Maximum age of a cached version listing in seconds (1 hour minus 5 minutes)
pub const FRESHNESS_WINDOW_SECS: i64 = 60 * 60 - 5 * 60;

/// Timeout for a single upstream request in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// Deadline for handling one inbound request in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 29;

/// How long a cache operation waits on a locked database in milliseconds
pub const CACHE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default listen address of the HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Default `<system>` segment of upstream repository names
pub const DEFAULT_SYSTEM: &str = "provider";

/// Environment variable holding the GitHub API token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Gateway configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub github: GitHubConfig,
    pub provider: ProviderConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub listen: String,
    /// Deadline for handling one request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Cache-related configuration
///
/// The freshness window is fixed at [`FRESHNESS_WINDOW_SECS`] and is not
/// configurable; unknown keys are rejected.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CacheConfig {
    /// Database file; defaults to `versions.db` in the data directory
    pub path: Option<PathBuf>,
}

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubConfig {
    pub base_url: String,
    pub per_page: u32,
    pub max_pages: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Provider naming configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub system: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Loads the configuration from a JSON file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn freshness_window(&self) -> TimeDelta {
        FRESHNESS_WINDOW
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Returns the configured database path, falling back to the data directory
    pub fn db_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(db_path)
    }
}

/// Reads the GitHub API token from the environment, ignoring empty values
pub fn github_token() -> Option<String> {
    std::env::var(GITHUB_TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Returns the path to the data directory for provider-registry-gateway.
/// Uses $XDG_DATA_HOME/provider-registry-gateway if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/provider-registry-gateway,
/// or ./provider-registry-gateway if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("versions.db")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("provider-registry-gateway")
}
