//! PostgreSQL pool, embedded migrations and readiness checks

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const APPLICATION_NAME: &str = "workout-tracker";

/// Applied versus embedded migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: usize,
    pub pending: Vec<i64>,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Pool settings taken from the `database` config section
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .test_before_acquire(true)
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name(APPLICATION_NAME);

    let pool = pool_options(config)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!(embedded = MIGRATOR.migrations.len(), "Database migrations applied");
    Ok(())
}

/// Round trip to the database
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Database ping failed");
        anyhow::Error::from(e)
    })?;
    Ok(())
}

/// Compare the migrations recorded in the database with the embedded set.
/// Fails when the bookkeeping table does not exist yet.
pub async fn migration_status(pool: &PgPool) -> Result<MigrationStatus> {
    let applied: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await
            .context("Failed to read applied migrations")?;

    Ok(MigrationStatus {
        applied: applied.len(),
        pending: pending_versions(&embedded_versions(), &applied),
    })
}

fn embedded_versions() -> Vec<i64> {
    MIGRATOR
        .migrations
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
        .collect()
}

/// Embedded versions missing from the applied list, ascending
pub fn pending_versions(embedded: &[i64], applied: &[i64]) -> Vec<i64> {
    let mut pending: Vec<i64> = embedded
        .iter()
        .copied()
        .filter(|version| !applied.contains(version))
        .collect();
    pending.sort_unstable();
    pending
}
