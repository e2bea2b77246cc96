use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Token signing and validation parameters.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_hours: u32,
    /// Clock-skew allowance applied to `exp`. Zero unless explicitly configured.
    pub leeway_seconds: u64,
}

/// The single static admin identity.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub admin: AdminAccount,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = required(&lookup, "JWT_SECRET")?;

        let expiration_hours: u32 = parsed(&lookup, "JWT_EXPIRATION_HOURS", 24)?;
        if expiration_hours == 0 {
            return Err(AppError::Configuration(
                "JWT_EXPIRATION_HOURS must be a positive integer".into(),
            ));
        }

        let admin_username = lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        if admin_username.is_empty() {
            return Err(AppError::Configuration(
                "ADMIN_USERNAME must not be empty".into(),
            ));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_port: parsed(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt: JwtSettings {
                secret,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "taskgate".to_string()),
                audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "taskgate-client".to_string()),
                expiration_hours,
                leeway_seconds: parsed(&lookup, "JWT_LEEWAY_SECONDS", 0)?,
            },
            admin: AdminAccount {
                username: admin_username,
                password: required(&lookup, "ADMIN_PASSWORD")?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!("{} must be set", key))),
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} must be a number", key))),
        None => Ok(default),
    }
}
