//! Process configuration for the server binary, read from the environment.

use std::env;

use skins_backend::config::app::AppConfig;
use skins_backend::config::db::{DbKind, RuntimeEnv};
use skins_backend::error::AppError;
use skins_backend::state::security_config::SecurityConfig;

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,
    pub db_kind: DbKind,
    pub jwt_secret: String,
    pub auto_provision_users: bool,
    pub app: AppConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port_str = env::var("BACKEND_PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let jwt_secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::config(format!(
                "BACKEND_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters"
            )));
        }

        let db_kind = match env::var("SKINS_DB_KIND") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse::<DbKind>()?,
            _ => DbKind::Postgres,
        };

        let auto_provision_users = env::var("AUTO_PROVISION_USERS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            runtime_env: RuntimeEnv::Prod,
            db_kind,
            jwt_secret,
            auto_provision_users,
            app: AppConfig::from_env()?,
        })
    }

    pub fn security(&self) -> SecurityConfig {
        SecurityConfig::new(self.jwt_secret.as_bytes())
            .with_auto_provision(self.auto_provision_users)
    }
}
