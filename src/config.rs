//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub http: HttpClientConfig,
    pub search: SearchConfig,
    pub alerts: AlertsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Search pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Custom Search API key
    pub api_key: String,
    /// Custom Search engine ID (`cx`)
    pub engine_id: String,
    /// Custom Search endpoint
    pub endpoint: String,
    /// Phrase prepended to every user query
    pub query_prefix: String,
    /// Number of results requested from the search API (1..=10)
    pub result_count: u32,
    /// Maximum number of known donation sources
    pub max_posts: usize,
    /// Maximum number of result pages fetched at once
    pub max_concurrent_fetches: usize,
    /// Href prefix that marks a qualifying link
    pub jar_prefix: String,
}

/// Alert renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    /// alerts.in.ua API token
    pub api_token: String,
    /// Active alerts endpoint
    pub endpoint: String,
    /// JSON file with the list of valid region names
    pub regions_file: PathBuf,
    /// Word appended to region names that lack it
    pub region_suffix: String,
    /// Source URL stored on every alert post
    pub source_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> String {
        format!(
            "donation_hub={},tower_http=debug",
            self.level.trim().to_ascii_lowercase()
        )
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (DONATION_HUB__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        Self::load_from(Path::new("config"))
    }

    /// Same as [`AppConfig::load`], reading `default.toml` and `local.toml`
    /// from `config_dir`
    pub fn load_from(config_dir: &Path) -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let default_file = config_dir.join("default");
        let local_file = config_dir.join("local");

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "data/donation_hub.db")?
            .set_default("http.user_agent", "DonationHub/0.1.0")?
            .set_default("http.timeout_seconds", 30)?
            .set_default("search.endpoint", "https://www.googleapis.com/customsearch/v1")?
            .set_default("search.query_prefix", "Збір на ")?
            .set_default("search.result_count", 10)?
            .set_default("search.max_posts", 6)?
            .set_default("search.max_concurrent_fetches", 5)?
            .set_default("search.jar_prefix", "https://send.monobank.ua/jar")?
            .set_default(
                "alerts.endpoint",
                "https://api.alerts.in.ua/v1/alerts/active.json",
            )?
            .set_default("alerts.regions_file", "config/regions.json")?
            .set_default("alerts.region_suffix", "область")?
            .set_default("alerts.source_url", "https://alerts.in.ua/")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from default.toml if it exists
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            // Load from local.toml if it exists (overrides default)
            .add_source(File::with_name(&local_file.to_string_lossy()).required(false))
            // Load from environment variables (DONATION_HUB__*)
            .add_source(
                Environment::with_prefix("DONATION_HUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        require_non_empty("search.api_key", &self.search.api_key)?;
        require_non_empty("search.engine_id", &self.search.engine_id)?;
        require_non_empty("alerts.api_token", &self.alerts.api_token)?;
        require_non_empty("search.jar_prefix", &self.search.jar_prefix)?;
        require_non_empty("alerts.region_suffix", &self.alerts.region_suffix)?;

        require_http_url("search.endpoint", &self.search.endpoint)?;
        require_http_url("alerts.endpoint", &self.alerts.endpoint)?;
        require_http_url("alerts.source_url", &self.alerts.source_url)?;

        if self.search.max_posts == 0 {
            return Err(AppError::Config(
                "search.max_posts must be greater than 0".to_string(),
            ));
        }

        if self.search.max_concurrent_fetches == 0 {
            return Err(AppError::Config(
                "search.max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }

        // The Custom Search API rejects num outside 1..=10
        if !(1..=10).contains(&self.search.result_count) {
            return Err(AppError::Config(
                "search.result_count must be between 1 and 10".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(AppError::Config(format!(
                "logging.level must be one of trace, debug, info, warn, error, got {}",
                self.logging.level
            )));
        }

        let format = self.logging.format.trim().to_ascii_lowercase();
        if !matches!(format.as_str(), "pretty" | "json") {
            return Err(AppError::Config(format!(
                "logging.format must be pretty or json, got {}",
                self.logging.format
            )));
        }

        if self.http.timeout_seconds == 0 {
            return Err(AppError::Config(
                "http.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn require_non_empty(key: &str, value: &str) -> Result<(), crate::error::AppError> {
    if value.trim().is_empty() {
        return Err(crate::error::AppError::Config(format!(
            "{key} must not be empty"
        )));
    }
    Ok(())
}

fn require_http_url(key: &str, value: &str) -> Result<(), crate::error::AppError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| crate::error::AppError::Config(format!("{key} is not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(crate::error::AppError::Config(format!(
            "{key} must use http or https, got {scheme}"
        ))),
    }
}
