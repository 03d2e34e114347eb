//! DTOs for matches_sea adapter.

use serde_json::Value;

use crate::entities::matches::GameType;

/// DTO for inserting a match in `created` status.
#[derive(Debug, Clone)]
pub struct MatchCreate {
    pub host_id: i64,
    pub course_name: String,
    pub course_ref: Option<String>,
    pub location: Option<String>,
    pub match_date: String,
    pub tee_time: String,
    pub max_players: i16,
    pub entry_fee_cents: i64,
    pub game_type: GameType,
    pub rules: Value,
    pub join_code: String,
}

impl MatchCreate {
    pub fn with_join_code(mut self, join_code: impl Into<String>) -> Self {
        self.join_code = join_code.into();
        self
    }
}

/// Full set of host-editable columns; every field is written.
#[derive(Debug, Clone)]
pub struct MatchUpdate {
    pub course_name: String,
    pub location: Option<String>,
    pub match_date: String,
    pub tee_time: String,
    pub max_players: i16,
    pub entry_fee_cents: i64,
    pub game_type: GameType,
    pub rules: Value,
}

/// Filters and page for the match listing.
#[derive(Debug, Clone, Default)]
pub struct MatchListFilter {
    /// 1-based
    pub page: u64,
    pub limit: u64,
    pub status: Option<crate::entities::matches::MatchStatus>,
    pub match_date: Option<String>,
}
