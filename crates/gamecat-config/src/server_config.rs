//! HTTP listener and storage settings

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// HTTP front door settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Echo file-permission diagnostics in 500 responses.
    /// Only for private deployments.
    #[serde(default)]
    pub expose_diagnostics: bool,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3002))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            expose_diagnostics: false,
        }
    }
}

/// Record store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Catalog file; relative paths resolve against the document root
    #[serde(default = "default_games_file")]
    pub games_file: PathBuf,
}

fn default_games_file() -> PathBuf {
    PathBuf::from("games.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            games_file: default_games_file(),
        }
    }
}
