use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::errors::{ApiError, Result};

const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const DELEGATE_CHECK_URL: &str = "https://spotmp3.app/api/check-direct-download";
const DELEGATE_DOWNLOAD_URL: &str = "https://spotmp3.app/api/direct-download";

/// Service configuration, constructed once at startup and shared read-only.
///
/// The upstream endpoint URLs default to the real services; overriding them is
/// only useful for pointing the clients at a local stand-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_delegate_check_url")]
    pub delegate_check_url: String,
    #[serde(default = "default_delegate_download_url")]
    pub delegate_download_url: String,
}

fn default_auth_url() -> String {
    SPOTIFY_AUTH_URL.to_string()
}

fn default_api_base() -> String {
    SPOTIFY_API_BASE.to_string()
}

fn default_delegate_check_url() -> String {
    DELEGATE_CHECK_URL.to_string()
}

fn default_delegate_download_url() -> String {
    DELEGATE_DOWNLOAD_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            auth_url: default_auth_url(),
            api_base: default_api_base(),
            delegate_check_url: default_delegate_check_url(),
            delegate_download_url: default_delegate_download_url(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
            auth_url: env::var("SPOTIFY_AUTH_URL").unwrap_or_else(|_| default_auth_url()),
            api_base: env::var("SPOTIFY_API_BASE").unwrap_or_else(|_| default_api_base()),
            delegate_check_url: env::var("DELEGATE_CHECK_URL")
                .unwrap_or_else(|_| default_delegate_check_url()),
            delegate_download_url: env::var("DELEGATE_DOWNLOAD_URL")
                .unwrap_or_else(|_| default_delegate_download_url()),
        }
    }

    /// Load configuration from a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration with fallback priority:
    /// 1. Environment variables
    /// 2. Config file (if given)
    ///
    /// Spotify credentials are required; there are no baked-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let env_config = Self::from_env();
        if env_config.has_credentials() {
            return Ok(env_config);
        }

        if let Some(path) = config_path {
            let file_config = Self::from_file(path)?;
            if file_config.has_credentials() {
                return Ok(file_config);
            }
        }

        Err(ApiError::Config(
            "Spotify credentials missing: set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET \
             or provide a config file"
                .to_string(),
        ))
    }

    pub fn has_credentials(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }
}
