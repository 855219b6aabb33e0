//! Runtime configuration.
//!
//! Everything is read from the process environment (after `dotenvy` has loaded
//! an optional `.env` file) and falls back to defaults suited to a local
//! single-user deployment.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:farm_records.db";

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host to bind to (default: "127.0.0.1")
    pub host: String,
    /// Port to bind to (default: 3000)
    pub port: u16,
    /// Directory served for any path that is not an API route
    pub static_dir: Option<PathBuf>,
    /// Single allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
}

/// Database and connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool: PoolSettings,
    /// How long shutdown waits for checked-out connections to come back
    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    /// Checkout timeout; past it the request fails as a connectivity error
    pub acquire_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: None,
            cors_origin: None,
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 3,
            acquire_timeout: Duration::from_secs(60),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            pool: PoolSettings::default(),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl PoolSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_connections == 0 {
            bail!("DB_POOL_MIN must be at least 1");
        }
        if self.max_connections < self.min_connections {
            bail!(
                "DB_POOL_MAX ({}) must not be smaller than DB_POOL_MIN ({})",
                self.max_connections,
                self.min_connections
            );
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_defaults = HttpConfig::default();
        let db_defaults = DatabaseConfig::default();

        let http = HttpConfig {
            host: lookup("HOST").unwrap_or(http_defaults.host),
            port: parse_or(&lookup, "PORT", http_defaults.port)?,
            static_dir: lookup("STATIC_DIR").map(PathBuf::from),
            cors_origin: lookup("CORS_ORIGIN"),
        };

        let pool = PoolSettings {
            min_connections: parse_or(&lookup, "DB_POOL_MIN", db_defaults.pool.min_connections)?,
            max_connections: parse_or(&lookup, "DB_POOL_MAX", db_defaults.pool.max_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                db_defaults.pool.acquire_timeout.as_secs(),
            )?),
        };
        pool.validate()?;

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or(db_defaults.url),
            pool,
            shutdown_grace: Duration::from_secs(parse_or(
                &lookup,
                "SHUTDOWN_GRACE_SECS",
                db_defaults.shutdown_grace.as_secs(),
            )?),
        };

        Ok(Self { http, database })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database.pool, PoolSettings::default());
        assert_eq!(config.database.pool.max_connections, 3);
        assert_eq!(config.database.shutdown_grace, Duration::from_secs(10));
        assert!(config.http.static_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_POOL_MAX", "5"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "2"),
            ("STATIC_DIR", "public"),
        ])
        .unwrap();

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.pool.max_connections, 5);
        assert_eq!(config.database.pool.acquire_timeout, Duration::from_secs(2));
        assert_eq!(config.http.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_pool_bounds_are_checked() {
        assert!(config_from(&[("DB_POOL_MIN", "0")]).is_err());
        assert!(config_from(&[("DB_POOL_MIN", "4"), ("DB_POOL_MAX", "3")]).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("HOST", "0.0.0.0"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.http.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }
}
