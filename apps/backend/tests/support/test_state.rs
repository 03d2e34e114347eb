use std::env;
use std::env::VarError;
use std::str::FromStr;
use std::sync::Arc;

use skins_backend::config::app::AppConfig;
use skins_backend::config::db::{DbKind, RuntimeEnv};
use skins_backend::infra::state::{build_state, StateBuilder};
use skins_backend::state::app_state::AppState;
use skins_backend::AppError;

use super::courses::StubCatalog;

fn read_env_db_kind() -> Result<Option<String>, AppError> {
    match env::var("SKINS_TEST_DB_KIND") {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(_) => Err(AppError::config("failed to read SKINS_TEST_DB_KIND")),
    }
}

/// `SKINS_TEST_DB_KIND`, defaulting to a fresh in-memory SQLite database.
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    let resolved = match read_env_db_kind()? {
        Some(ref raw) => DbKind::from_str(raw.as_str())?,
        None => DbKind::SqliteMemory,
    };
    Ok(resolved)
}

/// Test database plus the stub course catalog.
pub fn test_state_builder() -> Result<StateBuilder, AppError> {
    let db_kind = resolve_test_db_kind()?;
    Ok(build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(db_kind)
        .with_courses(Arc::new(StubCatalog::default())))
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    test_state_builder()?.build().await
}

pub async fn build_test_state_with(config: AppConfig) -> Result<AppState, AppError> {
    test_state_builder()?.with_config(config).build().await
}
