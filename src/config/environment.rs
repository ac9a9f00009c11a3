// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server, database, auth, media and HTTP configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::generate_jwt_secret;
use crate::constants::{defaults, pagination, recipes};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Normal operation
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let level = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{level}")
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// `sqlite::memory:` selects the in-memory database. Any other `sqlite:`
    /// URL or bare path is treated as a database file.
    ///
    /// # Errors
    ///
    /// Returns an error for non-SQLite URL schemes
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.contains("://") {
            Err(anyhow::anyhow!("Unsupported database URL scheme: {s}"))
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/foodgram.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Media storage configuration
    pub media: MediaConfig,
    /// HTTP layer configuration
    pub http: HttpConfig,
    /// Recipe and listing behaviour
    pub app_behavior: AppBehaviorConfig,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size
    pub max_connections: u32,
}

/// JWT settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Uploaded image storage
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory images are written to
    pub root: PathBuf,
    /// Public origin, without trailing slash
    pub public_base_url: String,
}

/// HTTP layer limits and CORS
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Comma-separated origins or `*`
    pub cors_allowed_origins: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

/// Listing and validation behaviour
#[derive(Debug, Clone, Copy)]
pub struct AppBehaviorConfig {
    /// Default page size
    pub page_size: u32,
    /// Upper bound for a single ingredient amount
    pub max_ingredient_amount: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or if `JWT_SECRET` is
    /// missing in production
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            host: env_var_or("HOST", defaults::HOST),
            http_port: env_var_or("HTTP_PORT", &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            environment,

            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL))
                    .context("Invalid DATABASE_URL value")?,
                max_connections: env_var_or(
                    "DATABASE_MAX_CONNECTIONS",
                    &defaults::DATABASE_MAX_CONNECTIONS.to_string(),
                )
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS value")?,
            },

            auth: AuthConfig {
                jwt_secret: load_jwt_secret(environment)?,
                jwt_expiry_hours: env_var_or(
                    "JWT_EXPIRY_HOURS",
                    &defaults::JWT_EXPIRY_HOURS.to_string(),
                )
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS value")?,
            },

            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", defaults::MEDIA_ROOT)),
                public_base_url: env_var_or("PUBLIC_BASE_URL", defaults::PUBLIC_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
            },

            http: HttpConfig {
                cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
                request_timeout_secs: env_var_or(
                    "REQUEST_TIMEOUT_SECS",
                    &defaults::REQUEST_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                max_body_bytes: env_var_or("MAX_BODY_BYTES", &defaults::MAX_BODY_BYTES.to_string())
                    .parse()
                    .context("Invalid MAX_BODY_BYTES value")?,
            },

            app_behavior: AppBehaviorConfig {
                page_size: env_var_or("PAGE_SIZE", &pagination::DEFAULT_PAGE_SIZE.to_string())
                    .parse()
                    .context("Invalid PAGE_SIZE value")?,
                max_ingredient_amount: env_var_or(
                    "MAX_INGREDIENT_AMOUNT",
                    &recipes::DEFAULT_MAX_INGREDIENT_AMOUNT.to_string(),
                )
                .parse()
                .context("Invalid MAX_INGREDIENT_AMOUNT value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its usable range
    pub fn validate(&self) -> Result<()> {
        if self.app_behavior.page_size == 0 || self.app_behavior.page_size > pagination::MAX_PAGE_SIZE
        {
            return Err(anyhow::anyhow!(
                "PAGE_SIZE must be between 1 and {}",
                pagination::MAX_PAGE_SIZE
            ));
        }

        if self.app_behavior.max_ingredient_amount < recipes::MIN_INGREDIENT_AMOUNT {
            return Err(anyhow::anyhow!(
                "MAX_INGREDIENT_AMOUNT must be at least {}",
                recipes::MIN_INGREDIENT_AMOUNT
            ));
        }

        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be positive"));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Pool Size: {}\n\
             - JWT Expiry: {}h\n\
             - Media Root: {}\n\
             - Public URL: {}\n\
             - CORS Origins: {}\n\
             - Page Size: {}\n\
             - Max Ingredient Amount: {}",
            self.environment,
            self.host,
            self.http_port,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.database.max_connections,
            self.auth.jwt_expiry_hours,
            self.media.root.display(),
            self.media.public_base_url,
            self.http.cors_allowed_origins,
            self.app_behavior.page_size,
            self.app_behavior.max_ingredient_amount,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read `JWT_SECRET`, generating an ephemeral one outside production
fn load_jwt_secret(environment: Environment) -> Result<Vec<u8>> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret.into_bytes()),
        _ if environment.is_production() => Err(anyhow::anyhow!(
            "JWT_SECRET must be set in production"
        )),
        _ => {
            warn!("JWT_SECRET not set; using a random secret, tokens will not survive a restart");
            Ok(generate_jwt_secret().to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_url() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/foodgram.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/foodgram.db")
            }
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/foodgram").is_err());
    }

    #[test]
    fn test_database_url_round_trip_string() {
        let url = DatabaseUrl::parse_url("sqlite:/var/lib/foodgram.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:/var/lib/foodgram.db");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("TEST"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("whatever"), Environment::Development);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG").to_string(), "debug");
        assert_eq!(LogLevel::from_str_or_default("nope"), LogLevel::Info);
    }
}
