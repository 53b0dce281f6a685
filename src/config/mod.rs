//! Configuration management
//!
//! YAML-based configuration with environment variable overrides, multiple
//! file locations, and defaults for every setting.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin_api: AdminApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to static files directory (dashboard build output)
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<PathBuf>,
    /// Whether to serve the dashboard SPA (enables fallback to index.html)
    #[serde(default = "default_serve_frontend")]
    pub serve_frontend: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5061
}

fn default_static_dir() -> Option<PathBuf> {
    let path = PathBuf::from("frontend/dist");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

fn default_serve_frontend() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            serve_frontend: default_serve_frontend(),
        }
    }
}

/// Admin backend connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminApiConfig {
    #[serde(default = "default_admin_api_url")]
    pub url: String,
    /// Timeout in seconds (supports both timeout_secs and timeout field names)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,
    /// Bearer token for the admin backend (optional)
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_admin_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            url: default_admin_api_url(),
            timeout_secs: default_timeout(),
            api_token: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Dashboard display and refresh preferences
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Activity feed auto-refresh interval in seconds (0 to disable)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Number of activities per page in listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Number of activities held in the live feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
    /// Default lookback window for security events (days)
    #[serde(default = "default_security_window_days")]
    pub security_window_days: u32,
    /// Default lookback window for statistics (days)
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: u32,
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}

fn default_feed_limit() -> u32 {
    25
}

fn default_security_window_days() -> u32 {
    7
}

fn default_stats_window_days() -> u32 {
    7
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            page_size: default_page_size(),
            feed_limit: default_feed_limit(),
            security_window_days: default_security_window_days(),
            stats_window_days: default_stats_window_days(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            admin_api: AdminApiConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables (prefixed with AUDIT_)
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Check for config path override from environment
        let config_path = std::env::var("AUDIT_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = if let Some(ref path) = config_path {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                serde_norway::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            PathBuf::from("/etc/audit-webui/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("audit-webui/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("AUDIT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("AUDIT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(dir) = std::env::var("AUDIT_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(serve) = std::env::var("AUDIT_SERVE_FRONTEND") {
            self.server.serve_frontend = serve.parse().unwrap_or(true);
        }

        if let Ok(url) = std::env::var("ADMIN_API_URL") {
            self.admin_api.url = url;
        }
        if let Ok(token) = std::env::var("ADMIN_API_TOKEN") {
            self.admin_api.api_token = Some(token);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("AUDIT_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        if let Ok(interval) = std::env::var("AUDIT_REFRESH_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.dashboard.refresh_interval_secs = secs;
            }
        }
    }

    /// Validate the loaded configuration
    fn validate(&self) -> Result<()> {
        if self.admin_api.url.trim().is_empty() {
            anyhow::bail!("admin_api.url must not be empty");
        }
        if self.admin_api.timeout_secs == 0 {
            anyhow::bail!("admin_api.timeout_secs must be greater than zero");
        }
        if self.dashboard.page_size == 0 {
            anyhow::bail!("dashboard.page_size must be greater than zero");
        }
        Ok(())
    }
}
