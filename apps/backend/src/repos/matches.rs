//! Match repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde_json::Value;

use crate::adapters::matches_sea as matches_adapter;
use crate::domain::rules::MatchRules;
use crate::entities::matches::{self, GameType, MatchStatus};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use crate::adapters::matches_sea::{MatchCreate, MatchListFilter, MatchUpdate};

/// Match domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i64,
    pub host_id: i64,
    pub course_name: String,
    pub course_ref: Option<String>,
    pub location: Option<String>,
    pub match_date: String,
    pub tee_time: String,
    pub max_players: i16,
    pub entry_fee_cents: i64,
    pub game_type: GameType,
    /// Stored rules object, flattened
    pub rules: Value,
    pub status: MatchStatus,
    pub join_code: Option<String>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
    pub lock_version: i32,
}

impl Match {
    pub fn is_host(&self, user_id: i64) -> bool {
        self.host_id == user_id
    }

    /// Typed rules for the stored `game_type`.
    pub fn parsed_rules(&self) -> Result<MatchRules, DomainError> {
        MatchRules::parse(self.game_type, Some(&self.rules)).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("stored rules for match {} are invalid: {e}", self.id),
            )
        })
    }
}

impl From<matches::Model> for Match {
    fn from(model: matches::Model) -> Self {
        Self {
            id: model.id,
            host_id: model.host_id,
            course_name: model.course_name,
            course_ref: model.course_ref,
            location: model.location,
            match_date: model.match_date,
            tee_time: model.tee_time,
            max_players: model.max_players,
            entry_fee_cents: model.entry_fee_cents,
            game_type: model.game_type,
            rules: model.rules.unwrap_or_else(|| Value::Object(Default::default())),
            status: model.status,
            join_code: model.join_code,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lock_version: model.lock_version,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<Match>, DomainError> {
    let row = matches_adapter::find_by_id(conn, match_id).await?;
    Ok(row.map(Match::from))
}

/// The match, or `NotFound(Match)`.
pub async fn require_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Match, DomainError> {
    let row = matches_adapter::require_match(conn, match_id).await?;
    Ok(Match::from(row))
}

pub async fn find_live_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<Match>, DomainError> {
    let row = matches_adapter::find_live_by_join_code(conn, join_code).await?;
    Ok(row.map(Match::from))
}

pub async fn join_code_in_use<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<bool, DomainError> {
    Ok(matches_adapter::join_code_exists(conn, join_code).await?)
}

/// Insert a match; `None` means the join code was taken concurrently.
pub async fn create_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MatchCreate,
) -> Result<Option<Match>, DomainError> {
    let row = matches_adapter::insert_match(conn, dto).await?;
    Ok(row.map(Match::from))
}

/// Turn a zero-row conditional write into the error the caller should see.
async fn lost_cas<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    expected: &[MatchStatus],
) -> DomainError {
    match find_by_id(conn, match_id).await {
        Ok(Some(current)) => DomainError::invalid_state(format!(
            "Match {match_id} is {} (expected {})",
            current.status.as_str(),
            expected
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" or ")
        )),
        Ok(None) => DomainError::match_not_found(match_id),
        Err(e) => e,
    }
}

pub async fn update_if_created<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    dto: MatchUpdate,
) -> Result<(), DomainError> {
    let rows = matches_adapter::update_if_created(conn, match_id, dto).await?;
    if rows == 0 {
        return Err(lost_cas(conn, match_id, &[MatchStatus::Created]).await);
    }
    Ok(())
}

/// `UPDATE … SET status = next WHERE id = ? AND status = expected`.
pub async fn transition_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    expected: MatchStatus,
    next: MatchStatus,
) -> Result<(), DomainError> {
    let rows = matches_adapter::transition_status(conn, match_id, expected, next).await?;
    if rows == 0 {
        return Err(lost_cas(conn, match_id, &[expected]).await);
    }
    Ok(())
}

/// Lock the match row for the rest of the transaction, requiring `expected`.
pub async fn touch_if_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    expected: MatchStatus,
) -> Result<(), DomainError> {
    let rows = matches_adapter::touch_if_status(conn, match_id, expected).await?;
    if rows == 0 {
        return Err(lost_cas(conn, match_id, &[expected]).await);
    }
    Ok(())
}

pub async fn delete_if_created<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<(), DomainError> {
    let rows = matches_adapter::delete_if_created(conn, match_id).await?;
    if rows == 0 {
        return Err(lost_cas(conn, match_id, &[MatchStatus::Created]).await);
    }
    Ok(())
}

pub async fn list_matches<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: MatchListFilter,
) -> Result<(Vec<Match>, u64), DomainError> {
    let (rows, total) = matches_adapter::list_matches(conn, filter).await?;
    Ok((rows.into_iter().map(Match::from).collect(), total))
}
