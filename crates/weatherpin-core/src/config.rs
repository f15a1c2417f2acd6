use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Hard ceiling on pinned entries, whatever the config says.
pub const MAX_PINNED_LIMIT: usize = 5;

/// Environment variable consulted when no identity token is configured.
pub const IDENTITY_ENV_VAR: &str = "WEATHERPIN_IDENTITY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(skip, default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Remote weather actor settings
    #[serde(default)]
    pub actor: ActorConfig,

    /// Panel behaviour
    #[serde(default)]
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Base URL of the weather actor gateway
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Transport timeout in seconds. The panel itself never times calls out.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Identity attached to calls (optional, can be set via environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:4943".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("weatherpin/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            identity_token: None,
        }
    }
}

impl ActorConfig {
    /// Identity from the config file, falling back to `WEATHERPIN_IDENTITY`.
    pub fn resolved_identity(&self) -> Option<String> {
        self.resolve_identity_with(|name| std::env::var(name).ok())
    }

    fn resolve_identity_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(token) = self.identity_token.as_ref().filter(|t| !t.is_empty()) {
            tracing::debug!("Using identity from config file");
            return Some(token.clone());
        }
        match lookup(IDENTITY_ENV_VAR) {
            Some(token) if !token.is_empty() => {
                tracing::debug!("Using identity from {} environment variable", IDENTITY_ENV_VAR);
                Some(token)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Maximum number of pinned cities (1..=5)
    #[serde(default = "default_max_pinned")]
    pub max_pinned: usize,
}

fn default_max_pinned() -> usize {
    MAX_PINNED_LIMIT
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            max_pinned: default_max_pinned(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weatherpin")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            actor: ActorConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_dir);

        if !config_path.exists() {
            let config = Self {
                config_dir,
                ..Self::default()
            };
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", config_path.display(), e.message()))
        })?;
        config.config_dir = config_dir;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.actor.endpoint, "actor.endpoint", &mut result);

        if self.actor.timeout_secs == 0 {
            result.add_error("actor.timeout_secs", "Timeout must be greater than 0");
        } else if self.actor.timeout_secs > 600 {
            result.add_warning(
                "actor.timeout_secs",
                "Timeout is unusually long (>10 minutes)",
            );
        }

        if self.actor.user_agent.trim().is_empty() {
            result.add_error("actor.user_agent", "User-Agent must not be empty");
        }

        if self.panel.max_pinned == 0 || self.panel.max_pinned > MAX_PINNED_LIMIT {
            result.add_error(
                "panel.max_pinned",
                format!("Must be between 1 and {}", MAX_PINNED_LIMIT),
            );
        }

        if self.actor.resolved_identity().is_none() {
            result.add_warning(
                "actor.identity_token",
                "No identity configured - calls will be anonymous",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no platform config directory".into()))?
            .join("weatherpin");

        Ok(config_dir.join("config.toml"))
    }
}
