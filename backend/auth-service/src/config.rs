//! Configuration management for Auth Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development, debug builds only)
//!
//! # Example
//!
//! ```no_run
//! use auth_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("gRPC listening on {}", settings.server.grpc_addr()?);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

const MIN_SECRET_LEN: usize = 32;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_env: String,
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub database: Option<DatabaseSettings>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn load() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let database = DatabaseSettings::from_lookup(&lookup)?;

        if database.is_none() && app_env != "development" {
            bail!("DATABASE_URL must be set when APP_ENV={}", app_env);
        }

        Ok(Settings {
            server: ServerSettings::from_lookup(&lookup)?,
            jwt: JwtSettings::from_lookup(&lookup)?,
            database,
            app_env,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

/// gRPC server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub grpc_port: u16,
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("GRPC_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            grpc_port: lookup("GRPC_PORT")
                .unwrap_or_else(|| "50052".to_string())
                .parse()
                .context("Invalid GRPC_PORT")?,
            request_timeout_secs: lookup("GRPC_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("Invalid GRPC_REQUEST_TIMEOUT_SECS")?,
        })
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.grpc_port)
            .parse()
            .with_context(|| format!("Invalid gRPC bind address {}:{}", self.host, self.grpc_port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// JWT signing settings
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl JwtSettings {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET must be set")?;

        if secret.len() < MIN_SECRET_LEN {
            warn!(
                length = secret.len(),
                minimum = MIN_SECRET_LEN,
                "JWT_SECRET is shorter than recommended"
            );
        }

        Ok(Self { secret })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            url,
            max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout_secs: lookup("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT_SECS")?,
        }))
    }
}
