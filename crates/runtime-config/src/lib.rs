//! Server configuration types.
//!
//! `stockroom-server` reads `stockroom.toml` through these types. Every section
//! and field has a default, so a missing file or a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stockroom_core::currency::{
    CurrencyConfigError, CurrencyTable, DEFAULT_CURRENCY, DEFAULT_CURRENCY_CODES,
};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "stockroom.toml";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STOCKROOM_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },
    #[error(transparent)]
    Currency(#[from] CurrencyConfigError),
}

/// Top-level configuration (persisted as `stockroom.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StockroomConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub currency: CurrencySettings,
    #[serde(default)]
    pub remote_images: RemoteImageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Holds the SQLite database and the `media/` directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_url: default_base_url(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencySettings {
    #[serde(default = "default_currency_codes")]
    pub codes: Vec<String>,
    #[serde(default = "default_currency")]
    pub default: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            codes: default_currency_codes(),
            default: default_currency(),
        }
    }
}

impl CurrencySettings {
    pub fn table(&self) -> Result<CurrencyTable, CurrencyConfigError> {
        CurrencyTable::new(&self.codes, &self.default)
    }
}

/// Downloading images from a URL given in `remote_image`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteImageSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteImageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_size_mb: default_max_size_mb(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteImageSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

fn default_port() -> u16 {
    3000
}
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_currency_codes() -> Vec<String> {
    DEFAULT_CURRENCY_CODES.iter().map(|c| c.to_string()).collect()
}
fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
fn default_max_size_mb() -> u64 {
    1
}
fn default_timeout_secs() -> u64 {
    10
}

impl StockroomConfig {
    /// Load `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PORT`, `STOCKROOM_DATA_DIR` and `BASE_URL` overrides.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT".into(),
                value: port.clone(),
            })?;
        }
        if let Some(dir) = get("STOCKROOM_DATA_DIR") {
            self.server.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("BASE_URL") {
            self.server.base_url = url;
        }
        Ok(())
    }
}

/// Config path from `STOCKROOM_CONFIG`, else `./stockroom.toml`.
pub fn config_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
