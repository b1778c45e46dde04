//! Configuration management for reelfinder

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "REELFINDER_API_KEYS";
/// Environment variable overriding the video API base URL
pub const API_HOST_ENV: &str = "REELFINDER_API_HOST";
/// Environment variable overriding the scrape target base URL
pub const SCRAPE_HOST_ENV: &str = "REELFINDER_SCRAPE_HOST";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Video API keys, tried in order and rotated when one runs out of quota
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Region hint sent with search requests
    #[serde(default = "default_region_code")]
    pub region_code: String,

    /// Relevance language hint sent with search requests
    #[serde(default = "default_relevance_language")]
    pub relevance_language: String,

    /// Override the video API base URL (development/testing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Override the scrape target base URL (development/testing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_host: Option<String>,

    /// Timeout for video API requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the scrape fallback page fetch, in seconds
    #[serde(default = "default_scrape_timeout_secs")]
    pub scrape_timeout_secs: u64,

    /// Upper bound on outbound video API requests per second
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Freshness window for search and detail cache entries, in hours
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Freshness window for trailer cache entries, in hours (unset = never stale)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_cache_ttl_hours: Option<u64>,
}

fn default_region_code() -> String {
    "IN".to_string()
}

fn default_relevance_language() -> String {
    "en".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_scrape_timeout_secs() -> u64 {
    8
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_cache_ttl_hours() -> u64 {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            region_code: default_region_code(),
            relevance_language: default_relevance_language(),
            api_host: None,
            scrape_host: None,
            request_timeout_secs: default_request_timeout_secs(),
            scrape_timeout_secs: default_scrape_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            cache_ttl_hours: default_cache_ttl_hours(),
            trailer_cache_ttl_hours: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".reelfinder").join("config.yaml"))
    }

    /// Resolve the config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path, applying environment overrides.
    ///
    /// A missing file is accepted as long as the environment supplies API keys.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_with(Self::resolve_path(path)?, |name| std::env::var(name).ok())
    }

    /// Load configuration using a custom environment lookup
    pub fn load_with<F>(path: PathBuf, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents).map_err(ConfigError::from)?
        } else if env(API_KEYS_ENV).is_some() {
            Config::default()
        } else {
            return Err(ConfigError::NotFound.into());
        };

        config.apply_overrides(env);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values
    pub fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(keys) = env(API_KEYS_ENV) {
            let parsed = parse_key_list(&keys);
            if !parsed.is_empty() {
                self.api_keys = parsed;
            }
        }
        if let Some(host) = env(API_HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.api_host = Some(host);
        }
        if let Some(host) = env(SCRAPE_HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.scrape_host = Some(host);
        }
    }

    /// Validate that the configuration can drive a resolver
    pub fn validate(&self) -> Result<()> {
        if self.api_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::MissingApiKey.into());
        }
        if self.request_timeout_secs == 0 || self.scrape_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be greater than 0".to_string()).into());
        }
        if self.requests_per_second == 0 {
            return Err(
                ConfigError::Invalid("requests_per_second must be greater than 0".to_string())
                    .into(),
            );
        }
        if self.cache_ttl_hours == 0 {
            return Err(
                ConfigError::Invalid("cache_ttl_hours must be greater than 0".to_string()).into(),
            );
        }
        if self.trailer_cache_ttl_hours == Some(0) {
            return Err(ConfigError::Invalid(
                "trailer_cache_ttl_hours must be greater than 0 (omit it to never expire)"
                    .to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        hours(self.cache_ttl_hours)
    }

    pub fn trailer_cache_ttl(&self) -> Option<Duration> {
        self.trailer_cache_ttl_hours.map(hours)
    }
}

fn hours(h: u64) -> Duration {
    Duration::from_secs(h.saturating_mul(60 * 60))
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_key_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
