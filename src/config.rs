use std::fs;
use std::path::PathBuf;

use chrono::Duration;
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::TokenSettings;

/// Signing secret used when none is configured; only fit for development
pub const DEFAULT_JWT_SECRET: &str = "stores-api-development-secret";

/// Name of the optional TOML file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Longest accepted access token lifetime (one year)
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 525_600;

/// Longest accepted refresh token lifetime (ten years)
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 3_650;

/// Configuration for the Stores API server
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// URL (or path) of the SQLite database
    pub database_url: String,
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// HS256 secret used to sign and verify tokens
    pub jwt_secret_key: String,
    /// Access token lifetime in minutes
    pub access_token_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_days: i64,
    /// User ID whose tokens carry the admin claim
    pub admin_user_id: i32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret_key", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("admin_user_id", &self.admin_user_id)
            .finish()
    }
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub jwt_secret_key: Option<String>,
    #[serde(default)]
    pub access_token_minutes: Option<i64>,
    #[serde(default)]
    pub refresh_token_days: Option<i64>,
    #[serde(default)]
    pub admin_user_id: Option<i32>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "stores-api", about = "REST API for stores, items and tags")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:5000
    #[clap(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Secret used to sign tokens
    #[clap(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret_key: Option<String>,

    /// Access token lifetime in minutes
    #[clap(long, env = "ACCESS_TOKEN_MINUTES")]
    pub access_token_minutes: Option<i64>,

    /// Refresh token lifetime in days
    #[clap(long, env = "REFRESH_TOKEN_DAYS")]
    pub refresh_token_days: Option<i64>,

    /// User ID granted the admin claim
    #[clap(long, env = "ADMIN_USER_ID")]
    pub admin_user_id: Option<i32>,

    /// Path to a TOML config file, overriding the platform config directory
    #[clap(long, env = "STORES_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "STORES_API_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[clap(long, env = "STORES_API_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{field} must be between 1 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            jwt_secret_key: update.jwt_secret_key.unwrap_or(self.jwt_secret_key),
            access_token_minutes: update.access_token_minutes.unwrap_or(self.access_token_minutes),
            refresh_token_days: update.refresh_token_days.unwrap_or(self.refresh_token_days),
            admin_user_id: update.admin_user_id.unwrap_or(self.admin_user_id),
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_minutes)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_days)
    }

    /// Checks that both token lifetimes are positive and bounded
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("access_token_minutes", self.access_token_minutes, MAX_ACCESS_TOKEN_MINUTES)?;
        check_range("refresh_token_days", self.refresh_token_days, MAX_REFRESH_TOKEN_DAYS)
    }

    /// Whether the server would sign tokens with the built-in development secret
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret_key == DEFAULT_JWT_SECRET
    }

    /// Settings for the token manager
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            secret: self.jwt_secret_key.clone(),
            access_ttl: self.access_token_ttl(),
            refresh_ttl: self.refresh_token_ttl(),
            admin_identity: self.admin_user_id,
        }
    }
}

fn check_range(field: &'static str, value: i64, max: i64) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, max })
    }
}

/// Returns the base (default) configuration
pub fn base_config() -> Config {
    Config {
        database_url: "data.db".to_string(),
        bind_address: "127.0.0.1:5000".to_string(),
        jwt_secret_key: DEFAULT_JWT_SECRET.to_string(),
        access_token_minutes: 15,
        refresh_token_days: 30,
        admin_user_id: 1,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or a path that does not exist yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, ConfigError> {
    let Some(path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !path.exists() {
        info!("Config file not found at {:?}, using defaults", path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let update = toml::from_str::<ConfigUpdate>(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    info!("Loaded configuration from {:?}", path);
    Ok(update)
}

/// Loads configuration from command line arguments and environment variables
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        bind_address: args.bind_address.clone(),
        jwt_secret_key: args.jwt_secret_key.clone(),
        access_token_minutes: args.access_token_minutes,
        refresh_token_days: args.refresh_token_days,
        admin_user_id: args.admin_user_id,
    }
}

/// The config file to read: `--config` if given, otherwise `config.toml` in
/// the platform config directory
pub fn config_file_path(args: &CliArgs) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    match ProjectDirs::from("com", "stores-api", "stores-api") {
        Some(dirs) => Some(dirs.config_dir().join(CONFIG_FILE_NAME)),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with values from
/// the config file, environment variables and command line arguments, in
/// order of increasing precedence
pub fn get_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let config = base_config()
        .apply_update(config_from_file(config_file_path(args))?)
        .apply_update(config_from_args(args));
    config.validate()?;

    info!(
        "Final configuration: database_url={}, bind_address={}, access_token={}min, refresh_token={}d, admin_user_id={}",
        config.database_url,
        config.bind_address,
        config.access_token_minutes,
        config.refresh_token_days,
        config.admin_user_id
    );

    Ok(config)
}

#[cfg(test)]
mod prop_tests;
