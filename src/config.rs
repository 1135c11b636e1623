//! Client configuration parsed from environment variables.

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_PATH: &str = "simsyn-credentials.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without trailing slash.
    pub api_base_url: String,
    pub timeouts: Timeouts,
    /// Credential file used by non-browser clients.
    pub storage_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            storage_path: DEFAULT_STORAGE_PATH.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SIMSYN_API_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `SIMSYN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SIMSYN_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SIMSYN_STORAGE_PATH`: default `simsyn-credentials.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or storage path is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = env_non_empty("SIMSYN_API_BASE_URL", DEFAULT_API_BASE_URL)?
            .trim_end_matches('/')
            .to_owned();
        let storage_path = env_non_empty("SIMSYN_STORAGE_PATH", DEFAULT_STORAGE_PATH)?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("SIMSYN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SIMSYN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_base_url, timeouts, storage_path })
    }
}

fn env_non_empty(var: &'static str, default: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().trim_end_matches('/').is_empty() => Err(ConfigError::Empty { var }),
        Ok(value) => Ok(value.trim().to_owned()),
        Err(_) => Ok(default.to_owned()),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
