//! Configuration management for the AquaScope dashboard
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AquaScopeError;
use crate::chat::ChatStrategy;
use crate::state::ColorScheme;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the AquaScope dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AquaScopeConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat responder settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Toast notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Fish identification settings
    #[serde(default)]
    pub identify: IdentifyConfig,
    /// Simulated sign-in settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Initial UI settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the browser front end
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// PEM certificate and key; plain HTTP when absent
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Chat responder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Remote endpoint or built-in keyword responder
    #[serde(default)]
    pub strategy: ChatStrategy,
    /// URL of the remote chat endpoint
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_chat_max_retries")]
    pub max_retries: u32,
}

/// Longest wait between two chat attempts
pub const CHAT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Slack between the chat budget and the server request timeout
const CHAT_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

impl ChatConfig {
    /// Worst case for one chat call: every attempt times out and every
    /// retry waits the longest backoff
    #[must_use]
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = u64::from(self.max_retries) + 1;
        Duration::from_secs(u64::from(self.timeout_seconds) * attempts)
            + CHAT_MAX_BACKOFF * self.max_retries
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Seconds a toast stays visible
    #[serde(default = "default_notification_ttl")]
    pub ttl_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyConfig {
    /// Delay before the simulated result appears
    #[serde(default = "default_identify_delay")]
    pub delay_ms: u64,
    /// Largest accepted upload
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Delay of the simulated sign-in
    #[serde(default = "default_auth_delay")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Language shown at startup
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Color scheme reported as the system preference
    #[serde(default)]
    pub system_color_scheme: ColorScheme,
    /// Speech capture and playback done by the browser front end
    #[serde(default = "default_client_speech")]
    pub client_speech: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; traces are exported when set
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_request_timeout() -> u32 {
    60
}

fn default_chat_endpoint() -> String {
    "https://sih-1-backend.onrender.com/chat".to_string()
}

fn default_chat_timeout() -> u32 {
    30
}

fn default_chat_max_retries() -> u32 {
    2
}

fn default_notification_ttl() -> u32 {
    5
}

fn default_identify_delay() -> u64 {
    2000
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

fn default_auth_delay() -> u64 {
    1500
}

fn default_client_speech() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_seconds: default_request_timeout(),
            tls: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            strategy: ChatStrategy::default(),
            endpoint: default_chat_endpoint(),
            timeout_seconds: default_chat_timeout(),
            max_retries: default_chat_max_retries(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_notification_ttl(),
        }
    }
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_identify_delay(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_auth_delay(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            system_color_scheme: ColorScheme::default(),
            client_speech: default_client_speech(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

/// Delays the app schedules its timers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub notification_ttl: Duration,
    pub analysis_delay: Duration,
    pub sign_in_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&AquaScopeConfig::default())
    }
}

impl From<&AquaScopeConfig> for Timings {
    fn from(config: &AquaScopeConfig) -> Self {
        Self {
            notification_ttl: Duration::from_secs(config.notifications.ttl_seconds.into()),
            analysis_delay: Duration::from_millis(config.identify.delay_ms),
            sign_in_delay: Duration::from_millis(config.auth.delay_ms),
        }
    }
}

impl AquaScopeConfig {
    /// Server request timeout, never shorter than a full chat call
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let configured = Duration::from_secs(self.server.request_timeout_seconds.into());
        configured.max(self.chat.worst_case_duration() + CHAT_TIMEOUT_GRACE)
    }

    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AQUASCOPE_CHAT__STRATEGY=local
        builder = builder.add_source(
            Environment::with_prefix("AQUASCOPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AquaScopeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aquascope").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.chat.endpoint.is_empty() {
            self.chat.endpoint = default_chat_endpoint();
        }
        if self.chat.timeout_seconds == 0 {
            self.chat.timeout_seconds = default_chat_timeout();
        }
        if self.notifications.ttl_seconds == 0 {
            self.notifications.ttl_seconds = default_notification_ttl();
        }
        if self.identify.max_upload_bytes == 0 {
            self.identify.max_upload_bytes = default_max_upload();
        }
        if self.ui.default_language.is_empty() {
            self.ui.default_language = default_language();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AquaScopeError::config("Server port cannot be 0").into());
        }

        if self.chat.timeout_seconds > 300 {
            return Err(
                AquaScopeError::config("Chat timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.chat.max_retries > 10 {
            return Err(AquaScopeError::config("Chat max retries cannot exceed 10").into());
        }

        if self.notifications.ttl_seconds > 3600 {
            return Err(AquaScopeError::config(
                "Notification lifetime cannot exceed 3600 seconds",
            )
            .into());
        }

        if self.identify.delay_ms > 60_000 || self.auth.delay_ms > 60_000 {
            return Err(AquaScopeError::config(
                "Simulated delays cannot exceed 60000 ms",
            )
            .into());
        }

        if self.identify.max_upload_bytes > 50 * 1024 * 1024 {
            return Err(AquaScopeError::config("Upload limit cannot exceed 50 MB").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AquaScopeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AquaScopeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !is_http_url(&self.chat.endpoint) {
            return Err(AquaScopeError::config(
                "Chat endpoint must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(AquaScopeError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AquaScopeConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.chat.strategy, ChatStrategy::Remote);
        assert_eq!(config.chat.timeout_seconds, 30);
        assert_eq!(config.notifications.ttl_seconds, 5);
        assert_eq!(config.identify.delay_ms, 2000);
        assert_eq!(config.ui.default_language, "en");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timings_from_config() {
        let timings = Timings::default();
        assert_eq!(timings.notification_ttl, Duration::from_secs(5));
        assert_eq!(timings.analysis_delay, Duration::from_millis(2000));
        assert_eq!(timings.sign_in_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AquaScopeConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AquaScopeConfig::default();
        config.chat.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_endpoint_scheme() {
        let mut config = AquaScopeConfig::default();
        config.chat.endpoint = "ftp://example.com/chat".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = AquaScopeConfig::default();
        config.chat.endpoint.clear();
        config.notifications.ttl_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.chat.endpoint, default_chat_endpoint());
        assert_eq!(config.notifications.ttl_seconds, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("aquascope-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[chat]\nstrategy = \"local\"\n\n[server]\nport = 9090\n\n[ui]\nsystem_color_scheme = \"dark\""
        )
        .unwrap();

        let config = AquaScopeConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.chat.strategy, ChatStrategy::Local);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.ui.system_color_scheme, ColorScheme::Dark);
        assert_eq!(config.notifications.ttl_seconds, 5);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AquaScopeConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("aquascope"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }

    #[test]
    fn test_request_timeout_covers_chat_budget() {
        let mut config = AquaScopeConfig::default();
        // 3 attempts of 30 s plus 2 backoffs of 5 s
        assert_eq!(config.chat.worst_case_duration(), Duration::from_secs(100));
        assert_eq!(config.request_timeout(), Duration::from_secs(105));

        config.server.request_timeout_seconds = 300;
        assert_eq!(config.request_timeout(), Duration::from_secs(300));

        config.chat.max_retries = 0;
        config.chat.timeout_seconds = 10;
        assert_eq!(config.chat.worst_case_duration(), Duration::from_secs(10));
    }
}
