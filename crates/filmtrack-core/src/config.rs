//! Configuration management for filmtrack

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Film collection API server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Web interface configuration
    #[serde(default)]
    pub web: WebConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Statistics view configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Film store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Film collection API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_api_port")]
    pub port: u16,
}

/// Web interface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_web_port")]
    pub port: u16,

    /// Base URL of the film collection API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Heading shown above the film list
    #[serde(default = "default_list_title")]
    pub list_title: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Statistics view configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Cap on the genres listed under "Top Genres"; unset lists all of them
    #[serde(default)]
    pub top_genres_limit: Option<usize>,
}

/// Film store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file with films to load at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_api_port() -> u16 {
    3000
}

const fn default_web_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    format!("http://{}:{}", default_host(), default_api_port())
}

fn default_list_title() -> String {
    "My Films".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_api_port(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_web_port(),
            api_base_url: default_api_base_url(),
            list_title: default_list_title(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from `filmtrack.*` and `FILMTRACK_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from("filmtrack")
    }

    /// Load configuration from a named file (extension optional) plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load_from(name: &str) -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("FILMTRACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
