//! Course-data collaborator.
//!
//! Match creation from a catalog course and the course lookup endpoints go
//! through [`CourseCatalog`]. The production implementation talks to the
//! golf course API over HTTP; tests inject their own.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tracing::{debug, warn};

use crate::config::app::CourseApiConfig;
use crate::domain::validation::{par_or_default, MAX_HOLE};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::logging::pii::Redacted;

const CACHE_CAPACITY: u64 = 1_000;

/// Provider ids arrive as either JSON strings or numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected id, got {other}"))),
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tee {
    #[serde(rename = "teeID", deserialize_with = "string_or_number")]
    pub tee_id: String,
    pub tee_name: String,
    #[serde(default)]
    pub tee_color: Option<String>,
    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub course_rating_men: Option<f64>,
    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub slope_men: Option<f64>,
    /// Per-hole `length1`..`length18` and any other provider fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Tee {
    /// Yardage of `hole_number` from this tee, when the provider has it.
    pub fn distance_yards(&self, hole_number: i16) -> Option<i32> {
        let raw = self.extra.get(&format!("length{hole_number}"))?;
        let yards = match raw {
            Value::Number(n) => n.as_i64()?,
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        i32::try_from(yards).ok().filter(|y| *y > 0)
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "courseID", deserialize_with = "string_or_number")]
    pub course_id: String,
    pub course_name: String,
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    #[serde_as(as = "Vec<PickFirst<(_, DisplayFromStr)>>")]
    pub pars_men: Vec<i64>,
    #[serde(default)]
    #[serde_as(as = "Vec<PickFirst<(_, DisplayFromStr)>>")]
    pub indexes_men: Vec<i64>,
    #[serde(default)]
    pub tees: Vec<Tee>,
}

impl Course {
    /// Par for a hole, 4 when the provider has no usable value.
    pub fn par_for_hole(&self, hole_number: i16) -> i16 {
        let idx = usize::try_from(hole_number - 1).ok();
        par_or_default(idx.and_then(|i| self.pars_men.get(i).copied()))
    }

    pub fn stroke_index_for_hole(&self, hole_number: i16) -> Option<i16> {
        let idx = usize::try_from(hole_number - 1).ok()?;
        self.indexes_men
            .get(idx)
            .and_then(|v| i16::try_from(*v).ok())
            .filter(|v| (1..=MAX_HOLE).contains(v))
    }

    /// `"<city>, <state>"` when both are known.
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) if !city.is_empty() && !state.is_empty() => {
                Some(format!("{city}, {state}"))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    #[serde(rename = "clubID", deserialize_with = "string_or_number")]
    pub club_id: String,
    pub club_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub courses: Vec<Value>,
}

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn get_course(&self, course_id: &str) -> Result<Course, DomainError>;
    async fn get_club(&self, club_id: &str) -> Result<Club, DomainError>;
}

pub fn find_tee<'a>(course: &'a Course, tee_id: &str) -> Option<&'a Tee> {
    course.tees.iter().find(|t| t.tee_id == tee_id)
}

/// The tee, or `NotFound(Tee)`.
pub fn require_tee<'a>(course: &'a Course, tee_id: &str) -> Result<&'a Tee, DomainError> {
    find_tee(course, tee_id).ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Tee,
            format!("Tee {tee_id} not found on course {}", course.course_id),
        )
    })
}

/// Match display name for a course played from `tee`.
pub fn course_display_name(course: &Course, tee: &Tee) -> String {
    format!("{} - {}", course.course_name, tee.tee_name)
}

fn validate_id(kind: &str, id: &str) -> Result<(), DomainError> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::Other(format!("{kind}Id")),
            format!("Invalid {kind} id '{id}'"),
        ))
    }
}

/// HTTP client for the golf course API, with a short-lived response cache.
#[derive(Clone)]
pub struct GolfApiCatalog {
    client: Client,
    base_url: Arc<str>,
    api_key: Option<Arc<str>>,
    courses: Cache<String, Arc<Course>>,
    clubs: Cache<String, Arc<Club>>,
}

impl GolfApiCatalog {
    pub fn from_config(cfg: &CourseApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build course API client: {e}")))?;

        Ok(Self {
            client,
            base_url: Arc::from(cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.as_deref().map(Arc::from),
            courses: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(cfg.cache_ttl)
                .build(),
            clubs: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(cfg.cache_ttl)
                .build(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.as_ref());
        }

        let response = request.send().await.map_err(|e| {
            warn!(path, error = %Redacted(&e.to_string()), "course API request failed");
            DomainError::upstream("Course data provider is unavailable")
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(path, status = status.as_u16(), "course API returned an error status");
            return Err(DomainError::upstream(format!(
                "Course data provider returned {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(path, error = %e, "course API response did not decode");
            DomainError::upstream("Course data provider returned an unexpected response")
        })
    }
}

#[async_trait]
impl CourseCatalog for GolfApiCatalog {
    async fn get_course(&self, course_id: &str) -> Result<Course, DomainError> {
        validate_id("course", course_id)?;
        if let Some(hit) = self.courses.get(course_id).await {
            debug!(course_id, "course cache hit");
            return Ok(hit.as_ref().clone());
        }
        let course: Course = self.fetch(&format!("courses/{course_id}")).await?;
        self.courses
            .insert(course_id.to_string(), Arc::new(course.clone()))
            .await;
        Ok(course)
    }

    async fn get_club(&self, club_id: &str) -> Result<Club, DomainError> {
        validate_id("club", club_id)?;
        if let Some(hit) = self.clubs.get(club_id).await {
            return Ok(hit.as_ref().clone());
        }
        let club: Club = self.fetch(&format!("clubs/{club_id}")).await?;
        self.clubs
            .insert(club_id.to_string(), Arc::new(club.clone()))
            .await;
        Ok(club)
    }
}

/// Catalog used when no provider is wired in; every lookup is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredCatalog;

#[async_trait]
impl CourseCatalog for UnconfiguredCatalog {
    async fn get_course(&self, _course_id: &str) -> Result<Course, DomainError> {
        Err(DomainError::upstream("Course data provider is not configured"))
    }

    async fn get_club(&self, _club_id: &str) -> Result<Club, DomainError> {
        Err(DomainError::upstream("Course data provider is not configured"))
    }
}
