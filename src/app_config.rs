//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with CAMPUS_, sections split by `__`)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like the database URL and the session key are kept in environment
//! variables (`DATABASE_URL`, `SECRET_KEY`), not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Campus Connect".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Connection pool configuration. The URL itself comes from `DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout_seconds: 10,
            sqlx_logging: false,
        }
    }
}

/// Community moderation thresholds, counted in downvotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModerationConfig {
    /// Items at or above this many downvotes are flagged
    pub flag_threshold: i32,
    /// Items at or above this many downvotes are deleted with their dependents
    pub delete_threshold: i32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            flag_threshold: 20,
            delete_threshold: 50,
        }
    }
}

impl ModerationConfig {
    /// Returns self if `0 < flag_threshold < delete_threshold`, otherwise the defaults.
    pub fn validated(self) -> Self {
        if self.flag_threshold > 0 && self.flag_threshold < self.delete_threshold {
            self
        } else {
            log::warn!(
                "Invalid moderation thresholds (flag = {}, delete = {}), using defaults",
                self.flag_threshold,
                self.delete_threshold
            );
            Self::default()
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub moderation: ModerationConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g. CAMPUS_SERVER__BIND_ADDRESS, CAMPUS_MODERATION__FLAG_THRESHOLD
            .add_source(
                Environment::with_prefix("CAMPUS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.moderation = app_config.moderation.validated();
        Ok(app_config)
    }
}

/// Initialize application configuration
///
/// This triggers the lazy loading of the config file and logs the result.
/// Should be called early in application startup.
pub fn init() {
    let config = get_config();
    log::info!(
        "Configuration loaded: site.name = {}, moderation = {}/{}",
        config.site.name,
        config.moderation.flag_threshold,
        config.moderation.delete_threshold
    );
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

pub fn server() -> ServerConfig {
    get_config().server
}

pub fn database() -> DatabaseConfig {
    get_config().database
}

pub fn moderation() -> ModerationConfig {
    get_config().moderation
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site.name, "Campus Connect");
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.moderation.flag_threshold, 20);
        assert_eq!(config.moderation.delete_threshold, 50);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[site]
name = "Test Campus"

[server]
bind_address = "127.0.0.1:9000"

[moderation]
flag_threshold = 5
delete_threshold = 10
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.site.name, "Test Campus");
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.moderation.flag_threshold, 5);
        assert_eq!(config.moderation.delete_threshold, 10);
        // Defaults should still apply for unspecified values
        assert_eq!(config.database.connect_timeout_seconds, 10);
    }

    #[test]
    fn test_inverted_thresholds_fall_back_to_defaults() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[moderation]
flag_threshold = 60
delete_threshold = 50
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.moderation, ModerationConfig::default());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml").unwrap();
        assert_eq!(config.site.name, "Campus Connect");
        assert_eq!(config.moderation.delete_threshold, 50);
    }
}
