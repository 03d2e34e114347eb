//! Tunables for match handling, scoring and the course-data API.
//!
//! Built once at startup with [`AppConfig::from_env`] and carried in
//! `AppState`; services take the section they need as a parameter.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::skins::ResolutionPolicy;
use crate::error::AppError;

pub const DEFAULT_JOIN_CODE_ATTEMPTS: u32 = 5;
pub const DEFAULT_COURSE_API_BASE_URL: &str = "https://www.golfapi.io/api/v2.3";
pub const DEFAULT_COURSE_API_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_COURSE_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// Draws allowed before join-code allocation gives up.
    pub join_code_attempts: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            join_code_attempts: DEFAULT_JOIN_CODE_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringConfig {
    pub resolution_policy: ResolutionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for CourseApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COURSE_API_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_millis(DEFAULT_COURSE_API_TIMEOUT_MS),
            cache_ttl: Duration::from_secs(DEFAULT_COURSE_CACHE_TTL_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub matches: MatchConfig,
    pub scoring: ScoringConfig,
    pub course_api: CourseApiConfig,
    /// Browser origins allowed by CORS; empty means the local dev client.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let join_code_attempts =
            parse_var::<u32>("JOIN_CODE_ATTEMPTS")?.unwrap_or(DEFAULT_JOIN_CODE_ATTEMPTS);
        if join_code_attempts == 0 {
            return Err(AppError::config("JOIN_CODE_ATTEMPTS must be at least 1"));
        }

        let resolution_policy = match non_empty_var("SKINS_RESOLUTION_POLICY") {
            Some(raw) => ResolutionPolicy::from_str(&raw).map_err(|_| {
                AppError::config(format!(
                    "SKINS_RESOLUTION_POLICY must be 'provisional' or 'all_players_scored', got '{raw}'"
                ))
            })?,
            None => ResolutionPolicy::default(),
        };

        let base_url = non_empty_var("COURSE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_COURSE_API_BASE_URL.to_string());
        let timeout_ms =
            parse_var::<u64>("COURSE_API_TIMEOUT_MS")?.unwrap_or(DEFAULT_COURSE_API_TIMEOUT_MS);
        let cache_ttl_secs = parse_var::<u64>("COURSE_CACHE_TTL_SECS")?
            .unwrap_or(DEFAULT_COURSE_CACHE_TTL_SECS);

        Ok(Self {
            matches: MatchConfig { join_code_attempts },
            scoring: ScoringConfig { resolution_policy },
            course_api: CourseApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: non_empty_var("COURSE_API_KEY"),
                timeout: Duration::from_millis(timeout_ms),
                cache_ttl: Duration::from_secs(cache_ttl_secs),
            },
            cors_origins: parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    pub fn with_resolution_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.scoring.resolution_policy = policy;
        self
    }
}

/// Comma-separated http(s) origins; blanks, `null` and other schemes are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::config(format!("{name} has an invalid value '{raw}'"))),
    }
}
