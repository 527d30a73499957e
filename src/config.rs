// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the validated [`AppConfig`]
//! loaded once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC-SHA256 signing secret (at least 32 bytes) | Required |
//! | `JWT_EXPIRATION` | Token lifetime in milliseconds | `86400000` (24h) |
//! | `SEED_ADMIN_EMAIL` | Email of an admin account created at startup | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin account | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the token signing secret (`jwt.secret`).
///
/// Every instance that issues or verifies tokens must share the same value.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable holding the token lifetime in milliseconds
/// (`jwt.expiration`).
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION";

pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default token lifetime: 24 hours.
pub const DEFAULT_JWT_EXPIRATION_MS: u64 = 86_400_000;

/// HS256 secrets shorter than this are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

/// Fatal configuration problems. These abort initialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("JWT secret is not configured (set JWT_SECRET)")]
    MissingSecret,

    #[error("JWT secret is {actual} bytes; at least 32 bytes are required")]
    SecretTooShort { actual: usize },

    #[error("JWT expiration must be a positive number of milliseconds, got {0:?}")]
    InvalidExpiration(String),

    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    #[error("SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD must be set together")]
    IncompleteSeedAdmin,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Credentials for an admin account created at startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub seed_admin: Option<SeedAdmin>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigurationError::MissingSecret)?;
        validate_secret(secret.as_bytes())?;

        let expiration = match lookup(JWT_EXPIRATION_ENV) {
            Some(raw) => parse_expiration(&raw)?,
            None => Duration::from_millis(DEFAULT_JWT_EXPIRATION_MS),
        };

        let seed_admin = match (lookup(SEED_ADMIN_EMAIL_ENV), lookup(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            (None, None) => None,
            _ => return Err(ConfigurationError::IncompleteSeedAdmin),
        };

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            jwt: JwtConfig { secret, expiration },
            seed_admin,
            log_format,
        })
    }
}

/// Reject empty or short signing secrets.
pub fn validate_secret(secret: &[u8]) -> Result<(), ConfigurationError> {
    if secret.is_empty() {
        return Err(ConfigurationError::MissingSecret);
    }
    if secret.len() < MIN_SECRET_BYTES {
        return Err(ConfigurationError::SecretTooShort {
            actual: secret.len(),
        });
    }
    Ok(())
}

fn parse_expiration(raw: &str) -> Result<Duration, ConfigurationError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigurationError::InvalidExpiration(raw.to_string())),
    }
}
