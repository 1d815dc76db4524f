use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::i18n::Language;
use crate::services::price_service::FetchPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid symbol lookup table: {0}")]
    Lookup(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub price_api_base_url: String,
    pub fetch: FetchPolicy,
    pub stocks_file: PathBuf,
    pub static_dir: PathBuf,
    pub default_language: Language,
}

impl AppConfig {
    /// Read settings from the process environment (after `.env` is loaded)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |var: &str| vars.get(var).map(|v| v.trim()).filter(|v| !v.is_empty());

        fn parse<T: std::str::FromStr>(var: &'static str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
            match raw {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                    var,
                    value: value.to_string(),
                }),
                None => Ok(default),
            }
        }

        let defaults = FetchPolicy::default();
        let timeout_secs = parse("FETCH_TIMEOUT_SECS", get("FETCH_TIMEOUT_SECS"), defaults.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "FETCH_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        let backoff_ms = parse(
            "FETCH_BACKOFF_MS",
            get("FETCH_BACKOFF_MS"),
            defaults.backoff.as_millis() as u64,
        )?;

        Ok(Self {
            bind_addr: parse("BIND_ADDR", get("BIND_ADDR"), SocketAddr::from(([0, 0, 0, 0], 5001)))?,
            price_api_base_url: get("PRICE_API_BASE_URL")
                .unwrap_or("https://query1.finance.yahoo.com")
                .to_string(),
            fetch: FetchPolicy {
                timeout: Duration::from_secs(timeout_secs),
                retries: parse("FETCH_RETRIES", get("FETCH_RETRIES"), defaults.retries)?,
                backoff: Duration::from_millis(backoff_ms),
            },
            stocks_file: PathBuf::from(get("STOCKS_FILE").unwrap_or("stocks.json")),
            static_dir: PathBuf::from(get("STATIC_DIR").unwrap_or("static")),
            default_language: parse("DEFAULT_LANGUAGE", get("DEFAULT_LANGUAGE"), Language::Zh)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.bind_addr.port(), 5001);
        assert_eq!(config.price_api_base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.retries, 2);
        assert_eq!(config.stocks_file, PathBuf::from("stocks.json"));
        assert_eq!(config.default_language, Language::Zh);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("FETCH_RETRIES", "0"),
            ("FETCH_BACKOFF_MS", "50"),
            ("DEFAULT_LANGUAGE", "en"),
            ("STOCKS_FILE", " "),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.fetch.retries, 0);
        assert_eq!(config.fetch.backoff, Duration::from_millis(50));
        assert_eq!(config.default_language, Language::En);
        // Blank values fall back to defaults
        assert_eq!(config.stocks_file, PathBuf::from("stocks.json"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = AppConfig::from_vars(vars(&[("FETCH_RETRIES", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "FETCH_RETRIES", .. }));

        let err = AppConfig::from_vars(vars(&[("FETCH_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "FETCH_TIMEOUT_SECS", .. }));
    }
}
