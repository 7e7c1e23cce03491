use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from store client construction
#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Explicitly constructed store client, injected into handlers via axum
/// state. Wraps the process-wide connection pool; cloning is cheap and
/// shares the pool.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Build the client from DATABASE_URL without opening a connection;
    /// connections are established on first use so the server can start
    /// (and report an unhealthy store) while the database is down.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DbInitError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DbInitError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy(&url)?;

        info!("Created database pool (max_connections={})", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs a trivial query against the store to verify connectivity
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
