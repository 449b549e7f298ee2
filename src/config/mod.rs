//! Backend configuration loading

use crate::core::error::ConfigError;
use crate::core::payment::INITIATE_PAYMENT_PATH;
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Primary environment variable holding the backend base URL
pub const BACKEND_URL_VAR: &str = "BACKEND_URL";

/// Accepted as a fallback so existing `.env` files of the web front-end keep working
pub const LEGACY_BACKEND_URL_VAR: &str = "VITE_BACKEND_URL";

/// Optional per-request timeout override, in seconds
pub const TIMEOUT_VAR: &str = "BACKEND_TIMEOUT_SECS";

fn default_timeout_secs() -> u64 {
    30
}

/// Where the payment-initiation service lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin (optionally with a path prefix) the endpoint is resolved against
    #[serde(serialize_with = "serialize_url", deserialize_with = "deserialize_url")]
    pub base_url: Url,

    /// Per-request timeout; an expired timeout counts as "no response"
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Create a configuration from a base URL string
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout_secs: default_timeout_secs(),
        })
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BACKEND_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(LEGACY_BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingField {
                field: BACKEND_URL_VAR.to_string(),
                context: "environment".to_string(),
            })?;

        let mut config = Self::new(base_url.trim())?;

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout_secs = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str::<Self>(&content)
            .map_err(|e| ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })?
            .checked()
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str::<Self>(yaml)
            .map_err(|e| ConfigError::ParseError {
                file: None,
                message: e.to_string(),
            })?
            .checked()
    }

    /// Full URL of the payment-initiation endpoint
    ///
    /// A trailing slash or a path prefix on the base URL is preserved:
    /// `https://api.example.com/v1` resolves to `https://api.example.com/v1/initiate-payment`.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            INITIATE_PAYMENT_PATH
        );
        url.set_path(&path);
        url
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        ensure_http_scheme(&self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                value: "0".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(self)
    }
}

fn serialize_url<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(url.as_str())
}

fn deserialize_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Url::parse(&raw).map_err(serde::de::Error::custom)
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field: BACKEND_URL_VAR.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })?;
    ensure_http_scheme(&url)?;
    Ok(url)
}

fn ensure_http_scheme(url: &Url) -> Result<(), ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            field: BACKEND_URL_VAR.to_string(),
            value: url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue {
            field: TIMEOUT_VAR.to_string(),
            value: raw.to_string(),
            message: "expected a positive number of seconds".to_string(),
        }),
    }
}
