//! Service configuration.
//!
//! Everything is read from the process environment (a `.env` file is loaded
//! first by `main`). Parsing goes through [`Config::from_lookup`] so it can be
//! exercised without touching the real environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials and endpoint for the AssemblyAI API
#[derive(Clone)]
pub struct AssemblyAiConfig {
    /// API key sent in the `authorization` header
    pub api_key: String,
    /// Base URL without the `/v2` suffix
    pub base_url: String,
    /// Connect timeout for each outbound request
    pub connect_timeout: Duration,
    /// Total timeout for each outbound request
    pub request_timeout: Duration,
}

impl AssemblyAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for AssemblyAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Completion polling behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed wait between status checks
    pub interval: Duration,
    /// Give up after this many status checks (None = poll until terminal)
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory that holds in-flight uploads
    pub upload_dir: PathBuf,
    pub poll: PollConfig,
    pub assemblyai: AssemblyAiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("ASSEMBLYAI_API_KEY").ok_or(ConfigError::Missing("ASSEMBLYAI_API_KEY"))?;

        let mut assemblyai = AssemblyAiConfig::new(api_key);
        if let Some(url) = get("ASSEMBLYAI_BASE_URL") {
            assemblyai = assemblyai.with_base_url(url);
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "HTTP_CONNECT_TIMEOUT_SECS")? {
            assemblyai.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "HTTP_TIMEOUT_SECS")? {
            assemblyai.request_timeout = Duration::from_secs(secs);
        }

        let mut poll = PollConfig::default();
        if let Some(ms) = parse_opt::<u64>(&lookup, "POLL_INTERVAL_MS")? {
            poll.interval = Duration::from_millis(ms);
        }
        poll.max_attempts = parse_opt::<u32>(&lookup, "POLL_MAX_ATTEMPTS")?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_opt(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            poll,
            assemblyai,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: raw,
        })
    }
}

fn parse_opt<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("ASSEMBLYAI_API_KEY", "secret")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.poll.interval, Duration::from_secs(3));
        assert_eq!(config.poll.max_attempts, None);
        assert_eq!(config.assemblyai.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.assemblyai.api_key, "secret");
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ASSEMBLYAI_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ASSEMBLYAI_API_KEY", "secret"),
            ("ASSEMBLYAI_BASE_URL", "http://localhost:9000/"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("UPLOAD_DIR", "/tmp/audio"),
            ("POLL_INTERVAL_MS", "250"),
            ("POLL_MAX_ATTEMPTS", "40"),
        ]))
        .unwrap();

        assert_eq!(config.assemblyai.base_url, "http://localhost:9000");
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, Some(40));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/audio"));
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("ASSEMBLYAI_API_KEY", "secret"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "not-a-port".to_string()
            }
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AssemblyAiConfig::new("very-secret-key");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("very-secret-key"));
    }
}
