//! Site addressing: where games, covers and the default cover live

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development server
    #[default]
    Development,
    /// Public deployment
    Production,
}

impl Environment {
    /// Server URL used when none is configured
    pub fn default_server_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:3000",
            Environment::Production => "https://games.example.com",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Site URLs and the local document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public origin of the site; falls back to the environment default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Base URL under which each game has a `{slug}/` folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_base_url: Option<String>,

    /// Cover used when a referenced cover is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image_url: Option<String>,

    /// Local directory that same-origin asset paths resolve against
    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,
}

fn default_document_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            games_base_url: None,
            default_image_url: None,
            document_root: default_document_root(),
        }
    }
}

impl SiteConfig {
    /// Effective server URL, without a trailing slash
    pub fn server_url(&self, environment: Environment) -> String {
        let url = self
            .server_url
            .as_deref()
            .unwrap_or_else(|| environment.default_server_url());
        url.trim_end_matches('/').to_string()
    }

    /// Effective games base URL, without a trailing slash
    pub fn games_base_url(&self, environment: Environment) -> String {
        match &self.games_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/games", self.server_url(environment)),
        }
    }

    pub fn default_image_url(&self, environment: Environment) -> String {
        match &self.default_image_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/images/default-game-cover.png",
                self.server_url(environment)
            ),
        }
    }
}
