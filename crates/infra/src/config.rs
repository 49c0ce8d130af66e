//! Configuration loading from the process environment.

use std::time::Duration;

use thiserror::Error;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_MS: &str = "DATABASE_ACQUIRE_TIMEOUT_MS";
pub const NUMBERING_LOCK_TIMEOUT_MS: &str = "NUMBERING_LOCK_TIMEOUT_MS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection and locking settings for the numbering store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Bounded wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// Bounded wait for a sequence row lock.
    pub lock_timeout: Duration,
}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_millis(3000);
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
            lock_timeout: Self::DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Read `DATABASE_URL` (required) and the optional tuning variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let mut config = Self::new(url);
        if let Some(v) = lookup(DATABASE_MAX_CONNECTIONS) {
            config.max_connections = parse_positive(DATABASE_MAX_CONNECTIONS, &v)?;
        }
        if let Some(v) = lookup(DATABASE_ACQUIRE_TIMEOUT_MS) {
            config.acquire_timeout =
                Duration::from_millis(parse_positive(DATABASE_ACQUIRE_TIMEOUT_MS, &v)?);
        }
        if let Some(v) = lookup(NUMBERING_LOCK_TIMEOUT_MS) {
            config.lock_timeout =
                Duration::from_millis(parse_positive(NUMBERING_LOCK_TIMEOUT_MS, &v)?);
        }
        Ok(config)
    }
}

// Keeps credentials in the URL out of logs.
impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let host = self
            .url
            .rsplit_once('@')
            .map(|(_, host)| host)
            .unwrap_or("<redacted>");
        f.debug_struct("DatabaseConfig")
            .field("url", &format_args!("postgres://***@{host}"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr + PartialOrd + Default,
    T::Err: core::fmt::Display,
{
    let parsed: T = value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if parsed <= T::default() {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}
