//! Application configuration loaded from environment.

use std::net::SocketAddr;
use std::str::FromStr;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. `None` runs against the in-memory user store.
    pub database_url: Option<String>,
    /// JWT signing secret (min 32 chars).
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds. Must exceed the access token lifetime.
    pub refresh_token_ttl_secs: i64,
    /// Argon2 memory cost in KiB.
    pub argon2_memory_kib: u32,
    /// Argon2 iterations.
    pub argon2_iterations: u32,
    /// Argon2 lanes.
    pub argon2_parallelism: u32,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let server_addr = std::env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "authgate_jwt_secret_change_in_production".to_string());
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let config = Self {
            server_addr,
            database_url,
            jwt_secret,
            access_token_ttl_secs: env_number("JWT_ACCESS_TTL_SECS", 900)?,
            refresh_token_ttl_secs: env_number("JWT_REFRESH_TTL_SECS", 30 * 24 * 3600)?,
            argon2_memory_kib: env_number("ARGON2_MEMORY_KIB", argon2::Params::DEFAULT_M_COST)?,
            argon2_iterations: env_number("ARGON2_ITERATIONS", argon2::Params::DEFAULT_T_COST)?,
            argon2_parallelism: env_number("ARGON2_PARALLELISM", argon2::Params::DEFAULT_P_COST)?,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the token issuer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret(MIN_JWT_SECRET_LEN));
        }
        if self.access_token_ttl_secs <= 0 || self.refresh_token_ttl_secs <= 0 {
            return Err(ConfigLoadError::NonPositiveTtl);
        }
        if self.refresh_token_ttl_secs <= self.access_token_ttl_secs {
            return Err(ConfigLoadError::RefreshTtlTooShort);
        }
        Ok(())
    }
}

fn env_number<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigLoadError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidNumber(key)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("Invalid number in {0}")]
    InvalidNumber(&'static str),
    #[error("JWT_SECRET must be at least {0} characters")]
    WeakJwtSecret(usize),
    #[error("Token lifetimes must be positive")]
    NonPositiveTtl,
    #[error("JWT_REFRESH_TTL_SECS must be greater than JWT_ACCESS_TTL_SECS")]
    RefreshTtlTooShort,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            server_addr: "127.0.0.1:3000".parse().unwrap(),
            database_url: None,
            jwt_secret: "x".repeat(32),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 86400,
            argon2_memory_kib: 19456,
            argon2_iterations: 2,
            argon2_parallelism: 1,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn accepts_sane_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_short_secret() {
        let mut config = sample();
        config.jwt_secret = "short".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::WeakJwtSecret(32))
        ));
    }

    #[test]
    fn rejects_refresh_ttl_not_longer_than_access() {
        let mut config = sample();
        config.refresh_token_ttl_secs = config.access_token_ttl_secs;
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::RefreshTtlTooShort)
        ));
    }

    #[test]
    fn rejects_zero_ttl() {
        let mut config = sample();
        config.access_token_ttl_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigLoadError::NonPositiveTtl)));
    }
}
