//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::Database;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:leads.db?mode=rwc` |
    /// | `DB_POOL_SIZE` | Maximum pooled connections | `20` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            lookup("SQLITE_PATH").unwrap_or_else(|| "sqlite:leads.db?mode=rwc".to_string());

        let pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(raw))?,
            None => Database::DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            addr,
            database_url,
            pool_size,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("Invalid DB_POOL_SIZE: {0}")]
    InvalidPoolSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8788");
        assert_eq!(config.database_url, "sqlite:leads.db?mode=rwc");
        assert_eq!(config.pool_size, 20);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ADMIN_ADDR", "0.0.0.0:9000"),
            ("SQLITE_PATH", "sqlite:/var/lib/leads.db"),
            ("DB_POOL_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite:/var/lib/leads.db");
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("ADMIN_ADDR", "localhost")])),
            Err(ConfigError::InvalidAddr)
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("DB_POOL_SIZE", "0")])),
            Err(ConfigError::InvalidPoolSize(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("DB_POOL_SIZE", "many")])),
            Err(ConfigError::InvalidPoolSize(_))
        ));
    }
}
