//! Configuration management for gamecat
//!
//! Resolves site URLs, the catalog file location and listener settings once at
//! startup. The resolved value is handed to the catalog service and the HTTP
//! front door; nothing reads the process environment after that.

mod server_config;
mod site_config;

pub use server_config::{ServerConfig, StorageConfig};
pub use site_config::{Environment, SiteConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Layered configuration error: {0}")]
    Layered(#[from] config::ConfigError),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/gamecat";
pub const LOCAL_CONFIG_FILE: &str = "gamecat.toml";

/// Prefix for environment variable overrides, e.g. `GAMECAT_SERVER__LISTEN`
pub const ENV_PREFIX: &str = "GAMECAT";

/// Main gamecat configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamecatConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl GamecatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer `GAMECAT_*` environment variables over a TOML file.
    ///
    /// Without an explicit path the first of `./gamecat.toml` and
    /// `/etc/gamecat/config.toml` that exists is used; with neither, the
    /// environment applies over the defaults.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(&default_search_paths()),
        };
        Self::load_with_env(path.as_deref(), env_source())
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                tracing::debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(
                    config::File::from(path).format(config::FileFormat::Toml),
                );
            }
            None => tracing::warn!("No configuration file found, using defaults"),
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the catalog cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("site.server_url", &self.server_url())?;
        check_url("site.games_base_url", &self.games_base_url())?;
        check_url("site.default_image_url", &self.default_image_url())?;

        if self.storage.games_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.games_file must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_url(&self) -> String {
        self.site.server_url(self.environment)
    }

    pub fn games_base_url(&self) -> String {
        self.site.games_base_url(self.environment)
    }

    pub fn default_image_url(&self) -> String {
        self.site.default_image_url(self.environment)
    }

    pub fn document_root(&self) -> &Path {
        &self.site.document_root
    }

    /// Catalog file path, resolved against the document root
    pub fn games_file_path(&self) -> PathBuf {
        if self.storage.games_file.is_absolute() {
            self.storage.games_file.clone()
        } else {
            self.site.document_root.join(&self.storage.games_file)
        }
    }
}

/// Config files tried in order when none is given: working directory, then system
fn default_search_paths() -> [PathBuf; 2] {
    [
        PathBuf::from(LOCAL_CONFIG_FILE),
        Path::new(CONFIG_DIR).join("config.toml"),
    ]
}

fn find_config_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));

    match rest {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(ConfigError::Invalid(format!(
            "{field} must be an http(s) URL, got {value:?}"
        ))),
    }
}
