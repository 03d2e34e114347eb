//! Pool construction and schema bootstrap.

use std::future::Future;
use std::process;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, DbOwner, RuntimeEnv};
use crate::error::AppError;
use crate::logging::pii::Redacted;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

fn engine(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry `connect_fn` at a fixed interval, returning the last error when all attempts fail.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::config("connection retry made no attempts")))
}

fn connect_options(url: &str, kind: DbKind) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url.to_owned());
    match kind {
        // Every in-memory connection is its own database: keep exactly one.
        DbKind::SqliteMemory => {
            opt.min_connections(1).max_connections(1);
        }
        DbKind::SqliteFile => {
            opt.min_connections(1).max_connections(4);
        }
        DbKind::Postgres => {
            opt.min_connections(1).max_connections(16);
        }
    }
    opt.acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(30))
        .sqlx_logging(false);
    opt
}

/// Open a pool for `kind` without touching the schema.
pub async fn connect_db(
    env: RuntimeEnv,
    kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(env, kind, owner)?;
    let opt = connect_options(&url, kind);

    if kind == DbKind::Postgres {
        retry_connection(
            || {
                let opt = opt.clone();
                async move {
                    Database::connect(opt).await.map_err(|e| {
                        AppError::config(format!(
                            "failed to connect to Postgres: {}",
                            Redacted(&e.to_string())
                        ))
                    })
                }
            },
            CONNECT_ATTEMPTS,
            CONNECT_INTERVAL_MS,
        )
        .await
    } else {
        Database::connect(opt).await.map_err(|e| {
            AppError::config(format!(
                "failed to connect to SQLite: {}",
                Redacted(&e.to_string())
            ))
        })
    }
}

/// Connect and bring the schema up to date; returns the application pool.
///
/// Postgres migrates through a short-lived owner connection, then opens the
/// app-role pool. SQLite migrates on the pool it returns, which is the only
/// option for the in-memory kind.
pub async fn bootstrap_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    info!(
        env = ?env,
        db_kind = ?kind,
        engine = engine(kind),
        pid = process::id(),
        "bootstrap=start"
    );

    let pool = match kind {
        DbKind::Postgres => {
            let owner = connect_db(env, kind, DbOwner::Owner).await?;
            migrate(&owner, MigrationCommand::Up).await?;
            if let Err(e) = owner.close().await {
                warn!(error = %Redacted(&e.to_string()), "failed to close migration pool");
            }
            connect_db(env, kind, DbOwner::App).await?
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let pool = connect_db(env, kind, DbOwner::App).await?;
            migrate(&pool, MigrationCommand::Up).await?;
            pool
        }
    };

    info!("bootstrap=ready");
    Ok(pool)
}
