//! Postgres connection pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{DbConfig, DbError};

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Create a new connection pool from `config` and verify connectivity.
///
/// sqlx has no separate max-idle knob; `min_connections` is the idle floor
/// the pool keeps warm, so `max_idle` maps onto it (clamped to `max_open`).
/// The trailing `SELECT 1` is the startup connectivity check: callers treat
/// a failure here as fatal rather than serving traffic against an
/// unreachable store.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DbError> {
    info!(
        max_open = config.max_open,
        max_idle = config.max_idle,
        lifetime_secs = config.conn_max_lifetime.as_secs(),
        "connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_open)
        .min_connections(config.max_idle.min(config.max_open))
        .max_lifetime(config.conn_max_lifetime)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
