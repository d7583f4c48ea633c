//! Server configuration types and loader
//!
//! Configuration lives in `<data_root>/config/propdesk.yaml`. Falls back to
//! defaults if the file doesn't exist.
//!
//! Environment Variable Overrides:
//! - PROPDESK_API_HOST: Override server.host
//! - PROPDESK_API_PORT: Override server.port
//! - PROPDESK_LOG: Override logging.level

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::utils::paths;

const MAX_CONFIG_BYTES: u64 = 1_048_576;
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
/// Longest allowed session lifetime (one year)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl ServerConfig {
    pub fn is_loopback(&self) -> bool {
        matches!(self.host.as_str(), "127.0.0.1" | "localhost" | "::1")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Hours a login session stays valid
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            session_ttl_hours: 12,
        }
    }
}

/// Admin account created on first start when the user store is empty.
/// `password_hash` is an Argon2 PHC string, see the `propdesk-hash` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Option lists the frontend renders in its forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiOptions {
    pub lead_sources: Vec<String>,
    pub account_categories: Vec<String>,
}

impl Default for UiOptions {
    fn default() -> Self {
        UiOptions {
            lead_sources: ["Walk-in", "Reference", "Website", "Social Media", "Broker", "Campaign"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            account_categories: ["Rent", "Commission", "Salary", "Maintenance", "Office", "Marketing"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default, skip_serializing)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
    #[serde(default)]
    pub ui: UiOptions,
}

impl AppConfig {
    /// Load configuration from `<data_root>/config/propdesk.yaml`
    ///
    /// Security measures:
    /// - File size limit: 1MB max
    /// - Values validated after environment overrides are applied
    pub fn load(data_root: &Path) -> AppResult<Self> {
        let path = paths::config_file_path(data_root);

        let mut config = if !path.exists() {
            AppConfig::default()
        } else {
            let metadata = fs::metadata(&path)?;
            if metadata.len() > MAX_CONFIG_BYTES {
                return Err(AppError::config(format!(
                    "Config too large: {} bytes (max 1MB)",
                    metadata.len()
                )));
            }
            let contents = fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents)?
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("PROPDESK_API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PROPDESK_API_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(level) = lookup("PROPDESK_LOG") {
            self.logging.level = level.to_lowercase();
        }
    }

    /// Validate configuration constraints
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::config("server.host must not be empty"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(AppError::config(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.auth.session_ttl_hours) {
            return Err(AppError::config(format!(
                "auth.session_ttl_hours must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            )));
        }

        if let Some(admin) = &self.bootstrap_admin {
            if admin.email.trim().is_empty() || admin.name.trim().is_empty() {
                return Err(AppError::config("bootstrap_admin needs a name and an email"));
            }
            if !admin.password_hash.starts_with("$argon2") {
                return Err(AppError::config(
                    "bootstrap_admin.password_hash must be an Argon2 hash (use propdesk-hash)",
                ));
            }
        }

        Ok(())
    }
}
