use std::env;

use chrono::Duration;

use crate::error::AppError;

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    /// Shared HS256 secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Lifetime of issued tokens, from `JWT_EXPIRATION_HOURS`.
    pub jwt_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required; a missing or empty value is a
    /// `ConfigurationError`. Everything else has a default, and values that would
    /// only fail later (token lifetime, bcrypt cost) are range-checked here.
    pub fn from_env() -> Result<Self, AppError> {
        let hours: i64 = parsed("JWT_EXPIRATION_HOURS", 24)?;
        let jwt_ttl = Duration::try_hours(hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| invalid("JWT_EXPIRATION_HOURS"))?;

        let bcrypt_cost: u32 = parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(invalid("BCRYPT_COST"));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::ConfigurationError(format!("{} must be set", name))),
    }
}

fn invalid(name: &str) -> AppError {
    AppError::ConfigurationError(format!("{} has an invalid value", name))
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| invalid(name)),
        Err(_) => Ok(default),
    }
}
