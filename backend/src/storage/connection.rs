use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, Sqlite, SqliteConnection};
use tracing::{info, warn};

use super::schema;
use crate::config::{DatabaseConfig, PoolSettings};
use crate::error::{FarmError, FarmResult};

/// Future returned by the body of a unit of work
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// DbConnection owns the connection pool and hands out connections and
/// transactions to the repositories.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new pool for `url` and make sure the schema exists
    pub async fn new(url: &str, settings: &PoolSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", url))?;

        schema::create_all(&pool)
            .await
            .context("Failed to create database schema")?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the configured database
    pub async fn init(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Opening database {} (pool {}..{})",
            config.url, config.pool.min_connections, config.pool.max_connections
        );
        Self::new(&config.url, &config.pool).await
    }

    /// Initialize a private in-memory database
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // every `sqlite::memory:` pool gets its own shared-cache database
        Self::new("sqlite::memory:", &PoolSettings::default()).await
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check a connection out of the pool.
    ///
    /// Any failure here means the database cannot be reached, so it is always
    /// reported as [`FarmError::Connectivity`].
    pub async fn acquire(&self) -> FarmResult<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(FarmError::Connectivity)
    }

    /// Run `work` inside a single transaction.
    ///
    /// Everything `work` executes commits together when it returns `Ok`, and
    /// is rolled back when it returns `Err`. The connection goes back to the
    /// pool on every path, including when the request future is dropped.
    pub async fn unit_of_work<T, F>(&self, work: F) -> FarmResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, FarmResult<T>> + Send,
    {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;

        match work(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Round-trip a trivial statement to prove the database is reachable
    pub async fn ping(&self) -> FarmResult<()> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// Close the pool, waiting at most `grace` for checked-out connections
    pub async fn close(&self, grace: Duration) {
        info!("Closing database pool");
        if tokio::time::timeout(grace, self.pool.close()).await.is_err() {
            warn!("Database pool did not drain within {:?}", grace);
        }
    }
}
