//! Runtime configuration from environment variables.

use crate::telemetry::TelemetryConfig;
use blocks_api::domain::config::DISABLE_ADMIN_OPERATIONS_FLAG;
use blocks_api::BlocksApiConfig;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BUCKET_DIR: &str = "./data/bucket";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var}: expected a whole number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("refresh interval must be at least one second")]
    ZeroRefreshInterval,

    #[error("bucket directory cannot be empty")]
    EmptyBucketDir,
}

/// Configuration of the block viewer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub http_addr: SocketAddr,
    /// Bucket root; one sub-directory per block.
    pub bucket_dir: PathBuf,
    /// Blocks loaded by the local process, served as the `loaded` view.
    pub local_dir: Option<PathBuf>,
    pub label: String,
    /// Raw value of the admin flag, kept verbatim for the flags endpoint.
    pub disable_admin_operations: String,
    pub disable_cors: bool,
    pub refresh_interval: Duration,
    pub telemetry: TelemetryConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 10902)),
            bucket_dir: PathBuf::from(DEFAULT_BUCKET_DIR),
            local_dir: None,
            label: String::new(),
            disable_admin_operations: "false".to_string(),
            disable_cors: false,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BV_HTTP_ADDR`: listen address (default: 0.0.0.0:10902)
    /// - `BV_BUCKET_DIR`: bucket root directory (default: ./data/bucket)
    /// - `BV_LOCAL_DIR`: directory of locally loaded blocks (default: unset)
    /// - `BV_LABEL`: label shown on the global and loaded views
    /// - `BV_DISABLE_ADMIN_OPERATIONS`: `true` refuses mark requests
    /// - `BV_DISABLE_CORS`: `true` or `1` drops CORS headers
    /// - `BV_REFRESH_INTERVAL_SECS`: seconds between bucket syncs (default: 1800)
    /// - `BV_LOG_LEVEL` or `RUST_LOG`: log filter (default: info)
    /// - `BV_JSON_LOGS`: `true` or `1` for JSON logs
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_addr = match lookup("BV_HTTP_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidAddress {
                var: "BV_HTTP_ADDR",
                value,
            })?,
            None => defaults.http_addr,
        };

        let refresh_interval = match lookup("BV_REFRESH_INTERVAL_SECS") {
            Some(value) => value
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "BV_REFRESH_INTERVAL_SECS",
                    value,
                })?,
            None => defaults.refresh_interval,
        };

        let config = Self {
            http_addr,
            bucket_dir: lookup("BV_BUCKET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.bucket_dir),
            local_dir: lookup("BV_LOCAL_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            label: lookup("BV_LABEL").unwrap_or(defaults.label),
            disable_admin_operations: lookup("BV_DISABLE_ADMIN_OPERATIONS")
                .unwrap_or(defaults.disable_admin_operations),
            disable_cors: lookup("BV_DISABLE_CORS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.disable_cors),
            refresh_interval,
            telemetry: TelemetryConfig {
                log_level: lookup("BV_LOG_LEVEL")
                    .or_else(|| lookup("RUST_LOG"))
                    .unwrap_or(defaults.telemetry.log_level),
                json_logs: lookup("BV_JSON_LOGS")
                    .map(|v| is_truthy(&v))
                    .unwrap_or(defaults.telemetry.json_logs),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.bucket_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyBucketDir);
        }
        Ok(())
    }

    /// Flags served by the flags endpoint.
    pub fn flags(&self) -> BTreeMap<String, String> {
        let mut flags = BTreeMap::from([
            ("http-address".to_string(), self.http_addr.to_string()),
            (
                "bucket-dir".to_string(),
                self.bucket_dir.display().to_string(),
            ),
            ("label".to_string(), self.label.clone()),
            (
                DISABLE_ADMIN_OPERATIONS_FLAG.to_string(),
                self.disable_admin_operations.clone(),
            ),
            ("disable-cors".to_string(), self.disable_cors.to_string()),
            (
                "refresh-interval".to_string(),
                format!("{}s", self.refresh_interval.as_secs()),
            ),
            ("log.level".to_string(), self.telemetry.log_level.clone()),
        ]);
        if let Some(local_dir) = &self.local_dir {
            flags.insert("local-dir".to_string(), local_dir.display().to_string());
        }
        flags
    }

    pub fn api_config(&self) -> BlocksApiConfig {
        BlocksApiConfig::from_flags(self.label.clone(), self.disable_cors, self.flags())
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ViewerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ViewerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.http_addr.to_string(), "0.0.0.0:10902");
        assert_eq!(config.refresh_interval, Duration::from_secs(1800));
        assert!(!config.api_config().disable_admin_operations);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BV_HTTP_ADDR", "127.0.0.1:8080"),
            ("BV_BUCKET_DIR", "/srv/bucket"),
            ("BV_LOCAL_DIR", "/srv/local"),
            ("BV_LABEL", "eu-1"),
            ("BV_REFRESH_INTERVAL_SECS", "60"),
            ("BV_DISABLE_CORS", "1"),
            ("RUST_LOG", "debug"),
            ("BV_JSON_LOGS", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.bucket_dir, PathBuf::from("/srv/bucket"));
        assert_eq!(config.local_dir, Some(PathBuf::from("/srv/local")));
        assert_eq!(config.label, "eu-1");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert!(config.disable_cors);
        assert_eq!(config.telemetry.log_level, "debug");
        assert!(config.telemetry.json_logs);
    }

    #[test]
    fn test_log_level_prefers_own_variable() {
        let config = load(&[("BV_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]).unwrap();
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn test_admin_flag_kept_verbatim() {
        let config = load(&[("BV_DISABLE_ADMIN_OPERATIONS", "TRUE")]).unwrap();
        assert_eq!(config.flags()[DISABLE_ADMIN_OPERATIONS_FLAG], "TRUE");
        assert!(!config.api_config().disable_admin_operations);

        let config = load(&[("BV_DISABLE_ADMIN_OPERATIONS", "true")]).unwrap();
        assert!(config.api_config().disable_admin_operations);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("BV_HTTP_ADDR", "localhost")]).unwrap_err(),
            ConfigError::InvalidAddress {
                var: "BV_HTTP_ADDR",
                value: "localhost".to_string()
            }
        );
        assert!(matches!(
            load(&[("BV_REFRESH_INTERVAL_SECS", "5m")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert_eq!(
            load(&[("BV_REFRESH_INTERVAL_SECS", "0")]).unwrap_err(),
            ConfigError::ZeroRefreshInterval
        );
        assert_eq!(
            load(&[("BV_BUCKET_DIR", "")]).unwrap_err(),
            ConfigError::EmptyBucketDir
        );
    }

    #[test]
    fn test_flags_carry_label_and_local_dir() {
        let config = load(&[("BV_LABEL", "eu-1"), ("BV_LOCAL_DIR", "/srv/local")]).unwrap();
        let api = config.api_config();
        assert_eq!(api.label, "eu-1");
        assert_eq!(api.flags["local-dir"], "/srv/local");
        assert_eq!(api.flags["refresh-interval"], "1800s");
    }
}
