use std::sync::Arc;

use crate::config::app::AppConfig;
use crate::config::db::{DbKind, RuntimeEnv};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::courses::{CourseCatalog, GolfApiCatalog};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState`, shared by `main` and the integration tests.
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    security: SecurityConfig,
    config: AppConfig,
    courses: Option<Arc<dyn CourseCatalog>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: None,
            security: SecurityConfig::default(),
            config: AppConfig::default(),
            courses: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_courses(mut self, courses: Arc<dyn CourseCatalog>) -> Self {
        self.courses = Some(courses);
        self
    }

    /// Connect (and migrate) when a database kind was given.
    ///
    /// Without an injected catalog the HTTP course client is built from
    /// `config.course_api`.
    pub async fn build(self) -> Result<AppState, AppError> {
        let courses: Arc<dyn CourseCatalog> = match self.courses {
            Some(courses) => courses,
            None => Arc::new(GolfApiCatalog::from_config(&self.config.course_api)?),
        };

        let state = match self.db_kind {
            Some(kind) => {
                let conn = bootstrap_db(self.env, kind).await?;
                AppState::new(conn, self.security)
            }
            None => AppState::new_without_db(self.security),
        };

        Ok(state.with_config(self.config).with_courses(courses))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
