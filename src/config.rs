use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::AppError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Where the static JSON snapshot lives
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Disk(PathBuf),
    Http(Url),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimit {
    pub per_minute: u32,
    pub burst: u32,
}

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: String,
    pub data_source: DataSource,
    /// `None` disables per-IP rate limiting
    pub rate_limit: Option<RateLimit>,
    pub enable_docs: bool,
}

impl Config {
    /// Serves the snapshot in `dir` with docs on and rate limiting off.
    pub fn for_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_source: DataSource::Disk(dir.into()),
            rate_limit: None,
            enable_docs: true,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests need not touch process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let data_source = match lookup("DATA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                // A trailing slash makes Url::join keep the last path segment.
                let normalized = if raw.ends_with('/') { raw } else { format!("{}/", raw) };
                let url = Url::parse(&normalized)
                    .map_err(|e| AppError::ConfigError(format!("DATA_BASE_URL: {}", e)))?;
                DataSource::Http(url)
            }
            None => DataSource::Disk(PathBuf::from(
                lookup("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            )),
        };

        let per_minute = parse_u32(&lookup, "RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?;
        let burst = parse_u32(&lookup, "RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST)?;
        let rate_limit = (per_minute > 0 && burst > 0).then_some(RateLimit { per_minute, burst });

        let enable_docs = lookup("ENABLE_DOCS")
            .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            data_source,
            rate_limit,
            enable_docs,
        })
    }
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> Result<u32, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} must be a non-negative integer, got {:?}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.data_source, DataSource::Disk(PathBuf::from(DEFAULT_DATA_DIR)));
        assert_eq!(
            config.rate_limit,
            Some(RateLimit {
                per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
                burst: DEFAULT_RATE_LIMIT_BURST
            })
        );
        assert!(config.enable_docs);
    }

    #[test]
    fn base_url_takes_precedence_over_data_dir() {
        let config = config_from(&[
            ("DATA_DIR", "/srv/data"),
            ("DATA_BASE_URL", "https://cdn.example.com/data"),
        ])
        .unwrap();
        match config.data_source {
            DataSource::Http(url) => assert_eq!(url.as_str(), "https://cdn.example.com/data/"),
            other => panic!("expected http source, got {:?}", other),
        }
    }

    #[test]
    fn zero_rate_limit_disables_limiting() {
        let config = config_from(&[("RATE_LIMIT_PER_MINUTE", "0")]).unwrap();
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(config_from(&[("DATA_BASE_URL", "not a url")]).is_err());
        match config_from(&[("RATE_LIMIT_BURST", "ten")]) {
            Err(AppError::ConfigError(msg)) => assert!(msg.starts_with("RATE_LIMIT_BURST")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }
}
