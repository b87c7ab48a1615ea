use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SuggestError};
use crate::util::expand_tilde;

const USER_AGENT: &str = concat!("casa-suggest/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestConfig {
    pub version: u32,
    /// Ranked location search, `?query=<text>`.
    pub search_endpoint: String,
    /// Geocoding autocomplete, `?text=<text>&apiKey=<key>`.
    pub geocode_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocode_api_key: Option<String>,
    /// Full location corpus, fetched once per local index.
    pub corpus_endpoint: String,
    pub search_delay_ms: u64,
    pub location_delay_ms: u64,
    pub local_limit: usize,
    pub log_dir: String,
    pub request_timeout_secs: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            search_endpoint: "http://localhost:3000/locations".into(),
            geocode_endpoint: "https://api.geoapify.com/v1/geocode/autocomplete".into(),
            geocode_api_key: None,
            corpus_endpoint: "http://localhost:3000/locations".into(),
            search_delay_ms: 800,
            location_delay_ms: 1000,
            local_limit: 10,
            log_dir: "~/.casa/logs".into(),
            request_timeout_secs: 10,
        }
    }
}

impl SuggestConfig {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn location_delay(&self) -> Duration {
        Duration::from_millis(self.location_delay_ms)
    }

    /// Log directory with `~` resolved.
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.log_dir))
    }

    /// Shared HTTP client for every fetcher built from this config.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(self.request_timeout_secs.max(1)))
            .build()
            .map_err(SuggestError::from)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".casa").join("config.json"))
}

/// Loads `~/.casa/config.json`, falling back to defaults when it is missing or unreadable.
pub fn load_config() -> SuggestConfig {
    config_path()
        .and_then(|path| load_config_from(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_from(path: &Path) -> Result<SuggestConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_config(config: &SuggestConfig) -> Result<()> {
    let path = config_path()
        .ok_or_else(|| SuggestError::Custom("Cannot find home directory".into()))?;
    save_config_to(&path, config)
}

pub fn save_config_to(path: &Path, config: &SuggestConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}
