//! Application configuration.
//!
//! Loading flow:
//! 1. Start with compiled [`AppConfig::default()`]
//! 2. If a JSON file is given, overlay its non-null keys
//! 3. Apply `ORDER_*` environment overrides (highest priority)
//! 4. [`AppConfig::validate`]

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_FILE_ENV: &str = "ORDER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat host application identity.
    pub app_id: String,
    /// Base URL of the spreadsheet data service.
    pub data_service_url: String,
    /// IANA zone used for order timestamps and the default pickup date.
    pub vendor_timezone: String,
    pub request_timeout_ms: u64,
    /// Prefix of the share-to-chat deep link; the encoded order text is appended.
    pub deep_link_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            data_service_url: String::new(),
            vendor_timezone: "Asia/Taipei".to_string(),
            request_timeout_ms: 10_000,
            deep_link_base: "https://line.me/R/msg/text/?".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the file named by `ORDER_CONFIG` (if any), then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_FILE_ENV).ok().filter(|p| !p.is_empty());
        let mut config = match path {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the file's non-null keys. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        debug!(?path, "loading config from file");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let defaults = serde_json::to_value(Self::default())?;
        let user: Value = serde_json::from_str(content)?;
        Ok(serde_json::from_value(overlay(defaults, user))?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.data_service_url).map_err(|e| ConfigError::InvalidValue {
            key: "data_service_url",
            reason: e.to_string(),
        })?;
        self.timezone()?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.deep_link_base.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "deep_link_base",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        Tz::from_str(&self.vendor_timezone).map_err(|e| ConfigError::InvalidValue {
            key: "vendor_timezone",
            reason: e.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level keys of `source` replace those of `target`; nulls are skipped.
fn overlay(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                if !value.is_null() {
                    target_map.insert(key, value);
                }
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Applies `ORDER_*` overrides read through `lookup`. Unparseable numbers are ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(v) = read("ORDER_APP_ID") {
        config.app_id = v;
    }
    if let Some(v) = read("ORDER_DATA_SERVICE_URL") {
        config.data_service_url = v;
    }
    if let Some(v) = read("ORDER_VENDOR_TIMEZONE") {
        config.vendor_timezone = v;
    }
    if let Some(v) = read("ORDER_REQUEST_TIMEOUT_MS") {
        match parse_u64_range(&v, 1, 600_000) {
            Some(ms) => config.request_timeout_ms = ms,
            None => warn!(key = "ORDER_REQUEST_TIMEOUT_MS", value = %v, "invalid timeout, ignoring"),
        }
    }
    if let Some(v) = read("ORDER_DEEP_LINK_BASE") {
        config.deep_link_base = v;
    }
}

pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> AppConfig {
        AppConfig {
            data_service_url: "https://sheetdb.io/api/v1/abc".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.vendor_timezone, "Asia/Taipei");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.deep_link_base, "https://line.me/R/msg/text/?");
    }

    #[test]
    fn test_file_overlay_keeps_unset_defaults() {
        let config = AppConfig::from_json_str(
            r#"{ "data_service_url": "https://example.test/api", "app_id": null, "request_timeout_ms": 2500 }"#,
        )
        .unwrap();
        assert_eq!(config.data_service_url, "https://example.test/api");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.app_id, "");
        assert_eq!(config.vendor_timezone, "Asia/Taipei");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            AppConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::from_file(Path::new("/definitely/not/here.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ORDER_APP_ID", "app-123"),
            ("ORDER_DATA_SERVICE_URL", "https://override.test/api"),
            ("ORDER_REQUEST_TIMEOUT_MS", "abc"),
            ("ORDER_VENDOR_TIMEZONE", ""),
        ]);
        let mut config = valid();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.app_id, "app-123");
        assert_eq!(config.data_service_url, "https://override.test/api");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.vendor_timezone, "Asia/Taipei");
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());

        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "data_service_url", .. }));

        let mut config = valid();
        config.vendor_timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "vendor_timezone", .. })
        ));

        let mut config = valid();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_u64_range() {
        assert_eq!(parse_u64_range("500", 1, 1000), Some(500));
        assert_eq!(parse_u64_range("0", 1, 1000), None);
        assert_eq!(parse_u64_range("x", 1, 1000), None);
    }
}
