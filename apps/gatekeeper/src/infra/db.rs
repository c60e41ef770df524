//! Database connection and schema bootstrap.

use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Connect without touching the schema. Postgres gets a few retries while it comes up.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(url);
    opt.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    // every in-memory sqlite connection is its own database
    if is_in_memory_sqlite(url) {
        opt.min_connections(1).max_connections(1);
    } else {
        opt.max_connections(10);
    }

    if url.starts_with("postgres") {
        retry_connection(|| connect_once(opt.clone()), CONNECT_ATTEMPTS, CONNECT_INTERVAL_MS).await
    } else {
        connect_once(opt).await
    }
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(url).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("schema migration failed: {e}")))?;
    info!("Database schema is current");
    Ok(conn)
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite") && url.contains(":memory:")
}

async fn connect_once(opt: ConnectOptions) -> Result<DatabaseConnection, AppError> {
    Database::connect(opt)
        .await
        .map_err(|e| AppError::config(format!("database connection failed: {e}")))
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(conn);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}
