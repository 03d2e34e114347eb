use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Runtime environment; `Test` enforces the `_test` database-name guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

/// Which database engine backs the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl DbKind {
    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!("unknown database kind '{other}'"))),
        }
    }
}

/// Access level used to connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application role (DML only)
    App,
    /// Schema owner (migrations)
    Owner,
}

/// Build the connection URL for `kind` from environment variables.
///
/// `DATABASE_URL`, when set, wins for Postgres in the prod environment.
pub fn db_url(env: RuntimeEnv, kind: DbKind, owner: DbOwner) -> Result<String, AppError> {
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            let path = sqlite_path(env)?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::Postgres => {
            if env == RuntimeEnv::Prod {
                if let Ok(url) = env::var("DATABASE_URL") {
                    if !url.trim().is_empty() {
                        return Ok(url);
                    }
                }
            }
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = db_name(env)?;
            let (username, password) = credentials(owner)?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
    }
}

fn sqlite_path(env: RuntimeEnv) -> Result<String, AppError> {
    let path = env::var("SQLITE_DB_PATH").unwrap_or_else(|_| match env {
        RuntimeEnv::Prod => "./data/skins.sqlite".to_string(),
        RuntimeEnv::Test => "./data/skins_test.sqlite".to_string(),
    });
    if env == RuntimeEnv::Test && !path.contains("test") {
        return Err(AppError::config(format!(
            "Test environment requires a sqlite path containing 'test', got '{path}'"
        )));
    }
    Ok(path)
}

fn db_name(env: RuntimeEnv) -> Result<String, AppError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test environment requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((must_var("SKINS_OWNER_USER")?, must_var("SKINS_OWNER_PASSWORD")?)),
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
