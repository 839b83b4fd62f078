/*!
 * Configuration support for the NPI Registry client
 *
 * Settings are layered: built-in defaults, then a TOML config file, then
 * `NPI_REGISTRY_*` environment variables.
 */

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::query::{DEFAULT_API_VERSION, DEFAULT_LIMIT, MAX_LIMIT};
use crate::{NpiRegistryError, Result};

/// Public registry endpoint
pub const DEFAULT_BASE_URL: &str = "https://npiregistry.cms.hhs.gov/api/";

/// Prefix for environment overrides, e.g. `NPI_REGISTRY_BASE_URL`
pub const ENV_PREFIX: &str = "NPI_REGISTRY";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registry endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `version` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// User-Agent header sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (None = transport default)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Limit used by the CLI when none is given
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Whether to show progress bars during research sweeps
    #[serde(default = "default_enable_progress_bar")]
    pub enable_progress_bar: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
            default_limit: default_limit(),
            enable_progress_bar: default_enable_progress_bar(),
        }
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_user_agent() -> String {
    format!("npi-registry-rust/{}", env!("CARGO_PKG_VERSION"))
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_enable_progress_bar() -> bool {
    true
}

impl ClientConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables over the defaults
    ///
    /// Supported environment variables:
    /// - `NPI_REGISTRY_BASE_URL`
    /// - `NPI_REGISTRY_API_VERSION`
    /// - `NPI_REGISTRY_USER_AGENT`
    /// - `NPI_REGISTRY_TIMEOUT_SECONDS`: number of seconds
    /// - `NPI_REGISTRY_DEFAULT_LIMIT`: 1 to 1200
    /// - `NPI_REGISTRY_ENABLE_PROGRESS_BAR`: "true" or "false"
    pub fn from_env() -> Result<Self> {
        Self::layered(None, environment())
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| NpiRegistryError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| NpiRegistryError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })?;
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/npi-registry/config.toml` on Linux,
    /// the Application Support directory on macOS,
    /// or `%APPDATA%\npi-registry\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "npi-registry")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location and environment
    ///
    /// Priority order (highest first):
    /// 1. Environment variables
    /// 2. Default config file (if it exists)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like `load`, but an explicit file replaces the default path and must exist
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(NpiRegistryError::Configuration {
                        message: format!("Config file not found: {}", path.display()),
                        suggestion: Some("Run `npireg config init` to create one".to_string()),
                    });
                }
                Self::layered(Some(path), environment())
            }
            None => {
                let default_path = Self::default_config_path();
                Self::layered(default_path.as_deref().filter(|p| p.exists()), environment())
            }
        }
    }

    fn layered(file: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }
        let config: Self = builder
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(NpiRegistryError::Configuration {
                message: "base_url cannot be empty".to_string(),
                suggestion: Some(format!("Use {}", DEFAULT_BASE_URL)),
            });
        }
        if self.default_limit == 0 || self.default_limit > MAX_LIMIT {
            return Err(NpiRegistryError::Configuration {
                message: format!(
                    "default_limit must be between 1 and {}, got {}",
                    MAX_LIMIT, self.default_limit
                ),
                suggestion: None,
            });
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<ClientConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: ClientConfig) {
    let mut guard = GLOBAL_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *guard = Some(config);
}

/// Get the global configuration (or the loaded configuration if not set)
///
/// A configuration that fails to load falls back to the defaults.
pub fn global_config() -> ClientConfig {
    let current = GLOBAL_CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone();
    current.unwrap_or_else(|| {
        ClientConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            ClientConfig::default()
        })
    })
}

/// Clear the global configuration
pub fn clear_global_config() {
    let mut guard = GLOBAL_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *guard = None;
}

/// Builder for customizing configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.config.timeout_seconds = seconds;
        self
    }

    pub fn default_limit(mut self, limit: u32) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.config.enable_progress_bar = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
