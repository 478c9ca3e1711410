//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Daily movement limits.
    #[serde(default)]
    pub limits: LimitSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`postgres://…` or `sqlite:…`).
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending schema migrations on startup.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Daily deposit/withdrawal ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    /// Maximum cumulative deposits per account per calendar day.
    #[serde(default = "default_daily_limit", with = "rust_decimal::serde::str")]
    pub deposit_daily: Decimal,
    /// Maximum cumulative withdrawals per account per calendar day.
    #[serde(default = "default_daily_limit", with = "rust_decimal::serde::str")]
    pub withdraw_daily: Decimal,
    /// IANA timezone whose calendar day bounds the limits.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            deposit_daily: default_daily_limit(),
            withdraw_daily: default_daily_limit(),
            timezone: default_timezone(),
        }
    }
}

fn default_daily_limit() -> Decimal {
    Decimal::new(100_000, 2)
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("WALLET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
