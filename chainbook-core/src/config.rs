//! Configuration management
//!
//! Settings live in `settings.json` inside the chainbook directory:
//! ```json
//! {
//!   "api": { "baseUrl": "http://localhost:8000", "requestTimeoutSecs": null },
//!   "session": { "retainTokenOnNetworkError": false }
//! }
//! ```
//! `cb config set` writes through [`Config::save`]; keys the core does not
//! manage are preserved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::Error;

/// Default API server (the development backend)
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "CHAINBOOK_API_URL";

/// Environment variable overriding the chainbook directory
pub const CHAINBOOK_DIR_ENV: &str = "CHAINBOOK_DIR";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    session: SessionSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSettings {
    #[serde(default)]
    retain_token_on_network_error: bool,
}

/// Chainbook configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// `None`: requests never time out
    pub request_timeout: Option<Duration>,
    pub retain_token_on_network_error: bool,
    /// URL taken from `CHAINBOOK_API_URL`; never written back to the file
    env_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            retain_token_on_network_error: false,
            env_api_url: None,
        }
    }
}

impl Config {
    /// Load config from the chainbook directory
    ///
    /// The API URL can be overridden with `CHAINBOOK_API_URL`.
    pub fn load(chainbook_dir: &Path) -> Result<Self> {
        let settings_path = chainbook_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let env_api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let api_url = env_api_url
            .clone()
            .or_else(|| raw.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_url,
            request_timeout: raw
                .api
                .request_timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
            retain_token_on_network_error: raw.session.retain_token_on_network_error,
            env_api_url,
        })
    }

    /// Replace the API URL after checking it
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        self.api_url = validate_api_url(url)?;
        Ok(())
    }

    /// `0` clears the timeout
    pub fn set_request_timeout_secs(&mut self, secs: u64) {
        self.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    /// Save config to the chainbook directory, keeping unmanaged keys
    pub fn save(&self, chainbook_dir: &Path) -> Result<()> {
        let settings_path = chainbook_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        if self.env_api_url.as_deref() != Some(self.api_url.as_str()) {
            settings.api.base_url = Some(self.api_url.clone());
        }
        settings.api.request_timeout_secs = self.request_timeout.map(|d| d.as_secs());
        settings.session.retain_token_on_network_error = self.retain_token_on_network_error;

        std::fs::create_dir_all(chainbook_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

/// Check that `raw` is an http(s) URL; returns it without trailing slashes
pub fn validate_api_url(raw: &str) -> crate::Result<String> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", raw, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::Config(format!(
            "API URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Chainbook directory: `$CHAINBOOK_DIR`, else `~/.chainbook`
pub fn chainbook_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CHAINBOOK_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".chainbook"))
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))
}
