//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix `BREEDER_`, `__` separates nested keys,
//!    e.g. `BREEDER_DATABASE__URL`, `BREEDER_LINKS__BASE_URL`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/breeder-service/config.toml
//! 4. System directory: /etc/breeder-service/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const APP_DIR: &str = "breeder-service";
const ENV_PREFIX: &str = "BREEDER_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Base URL used to build hypermedia links
    #[serde(default)]
    pub links: LinksConfig,

    /// Database configuration; without it records are kept in memory
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Delayed creation and task status retention
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or filter directive (e.g. "info", "breeder_service=debug,tower_http=info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Link generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// API root that link paths are appended to, e.g. `https://api.example.com/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Connection attempts after the first one fails
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in seconds (doubled on each attempt)
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_secs: default_connection_timeout(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

/// Delayed creation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Fixed delay before a delayed submission is persisted
    #[serde(default = "default_completion_delay")]
    pub completion_delay_secs: u64,

    /// How long finished task statuses stay queryable
    #[serde(default = "default_retention")]
    pub retention_secs: u64,

    /// Interval between eviction sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// How long shutdown waits for scheduled creations
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl TasksConfig {
    pub fn completion_delay(&self) -> Duration {
        Duration::from_secs(self.completion_delay_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            completion_delay_secs: default_completion_delay(),
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode: "permissive", "restrictive" or "disabled"
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    2
}

fn default_completion_delay() -> u64 {
    30
}

fn default_retention() -> u64 {
    600
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_shutdown_timeout() -> u64 {
    35
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from all sources
    ///
    /// File-based configs are merged lowest priority first:
    /// /etc, then XDG, then ./config.toml. `BREEDER_` environment
    /// variables override all of them.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file (plus environment overrides)
    ///
    /// Useful for tests and non-standard deployments.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the service misbehave at runtime
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(figment::Error::from(msg.to_string()).into()) };

        if self.links.base_url.trim().is_empty() {
            return invalid("links.base_url must not be empty");
        }
        if url::Url::parse(&self.links.base_url).is_err() {
            return invalid("links.base_url must be an absolute URL");
        }
        // Links are echoed in Location/Link headers, which only carry visible ASCII
        if http::HeaderValue::from_str(&self.links.base_url).is_err() {
            return invalid("links.base_url must be ASCII (percent-encode or punycode it)");
        }
        if self.tasks.sweep_interval_secs == 0 {
            return invalid("tasks.sweep_interval_secs must be greater than zero");
        }
        if let Some(ref db) = self.database {
            if db.url.trim().is_empty() {
                return invalid("database.url must not be empty");
            }
            if db.min_connections > db.max_connections {
                return invalid("database.min_connections must not exceed max_connections");
            }
        }
        if !matches!(
            self.middleware.cors_mode.as_str(),
            "permissive" | "restrictive" | "disabled"
        ) {
            return invalid("middleware.cors_mode must be permissive, restrictive or disabled");
        }
        Ok(())
    }

    /// Config file locations in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_DIR).join("config.toml"));
        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                log_format: default_log_format(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            links: LinksConfig::default(),
            database: None,
            tasks: TasksConfig::default(),
            middleware: MiddlewareConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.tasks.completion_delay_secs, 30);
        assert_eq!(config.links.base_url, "http://localhost:8080/api/v1");
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let file = write_config(
            r#"
            [service]
            name = "breeders"
            port = 9000

            [links]
            base_url = "https://breeders.example.com/api/v1"

            [database]
            url = "postgres://app:secret@db/breeders"

            [tasks]
            completion_delay_secs = 5
            "#,
        );

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "breeders");
        assert_eq!(config.service.port, 9000);
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.links.base_url, "https://breeders.example.com/api/v1");
        assert_eq!(config.tasks.completion_delay(), Duration::from_secs(5));
        assert_eq!(config.tasks.retention_secs, 600);

        let db = config.database.unwrap();
        assert_eq!(db.url, "postgres://app:secret@db/breeders");
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.max_retries, 5);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = Config::load_from("/nonexistent/breeder-service.toml").unwrap();
        assert_eq!(config.service.name, "breeder-service");
    }

    #[test]
    fn test_zero_sweep_interval_is_rejected() {
        let file = write_config("[service]\nname = \"b\"\n[tasks]\nsweep_interval_secs = 0\n");
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_base_url_must_be_absolute_ascii() {
        let mut config = Config::default();
        config.links.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.links.base_url = "http://exämple.test/api/v1".into();
        assert!(config.validate().is_err());

        config.links.base_url = "http://xn--exmple-cua.test/api/v1".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_cors_mode_is_rejected() {
        let mut config = Config::default();
        config.middleware.cors_mode = "everything".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_pool_bounds_are_rejected() {
        let mut config = Config::default();
        config.database = Some(DatabaseConfig {
            url: "postgres://localhost/breeders".into(),
            max_connections: 1,
            min_connections: 4,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }
}
