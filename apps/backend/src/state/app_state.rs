use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::app::AppConfig;
use crate::services::courses::{CourseCatalog, UnconfiguredCatalog};

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool (absent in state built for pure HTTP tests)
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub config: AppConfig,
    /// Course-data collaborator
    pub courses: Arc<dyn CourseCatalog>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            config: AppConfig::default(),
            courses: Arc::new(UnconfiguredCatalog),
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            config: AppConfig::default(),
            courses: Arc::new(UnconfiguredCatalog),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_courses(mut self, courses: Arc<dyn CourseCatalog>) -> Self {
        self.courses = courses;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
