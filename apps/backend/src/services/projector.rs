//! Read-side assembly of match, score and scorecard views.
//!
//! Nothing here writes. Every view is rebuilt from the tables on each call.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::domain::validation::{MAX_HOLE, MIN_HOLE};
use crate::entities::match_players::MembershipStatus;
use crate::entities::matches::{GameType, MatchStatus};
use crate::errors::domain::DomainError;
use crate::repos::holes::{self, Hole};
use crate::repos::matches::{self as matches_repo, Match};
use crate::repos::memberships::{self, Membership};
use crate::repos::scores::{self, HoleScore};
use crate::repos::users::{self, User};

const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub user_id: i64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub handicap: Option<f64>,
    pub status: MembershipStatus,
    pub entry_fee_paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub id: i64,
    pub host_id: i64,
    pub host_name: String,
    pub course_name: String,
    pub course_ref: Option<String>,
    pub location: Option<String>,
    pub date: String,
    pub tee_time: String,
    pub max_players: i16,
    /// Memberships currently `joined`
    pub current_players: usize,
    pub entry_fee_cents: i64,
    pub game_type: GameType,
    pub rules: Value,
    pub status: MatchStatus,
    pub join_code: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreView {
    pub user_id: i64,
    pub user_name: String,
    pub score: i16,
    pub is_skin_winner: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleView {
    pub hole_number: i16,
    pub par: i16,
    pub distance_yards: Option<i32>,
    pub stroke_index: Option<i16>,
    pub skin_value_cents: i64,
    pub carryover_from_previous: bool,
    pub completed: bool,
    pub scores: Vec<ScoreView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScoresView {
    pub match_id: i64,
    pub match_status: MatchStatus,
    pub holes: Vec<HoleView>,
    /// Winning entries across the match
    pub total_skins: usize,
    pub completed_holes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardCell {
    pub user_id: i64,
    pub name: String,
    /// `None` until the player records the hole
    pub strokes: Option<i32>,
    pub is_skin_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardRow {
    pub hole_number: i16,
    /// `None` for holes nobody has played yet
    pub par: Option<i16>,
    pub distance_yards: Option<i32>,
    pub skin_value_cents: Option<i64>,
    pub completed: bool,
    pub cells: Vec<ScorecardCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTotals {
    pub user_id: i64,
    pub name: String,
    pub strokes: i32,
    pub holes_played: usize,
    pub skins_won: usize,
    /// Sum of the stakes of holes this player won
    pub winnings_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardView {
    pub match_id: i64,
    pub course_name: String,
    pub rows: Vec<ScorecardRow>,
    pub totals: Vec<PlayerTotals>,
}

fn name_of(users: &HashMap<i64, User>, user_id: i64) -> String {
    users
        .get(&user_id)
        .map(|u| u.display_name.clone())
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

async fn users_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: impl IntoIterator<Item = i64>,
) -> Result<HashMap<i64, User>, DomainError> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    let found = users::find_users_by_ids(conn, &ids).await?;
    Ok(found.into_iter().map(|u| (u.id, u)).collect())
}

/// Assemble a [`MatchView`] for an already loaded match.
pub async fn view_of<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    m: Match,
) -> Result<MatchView, DomainError> {
    let members = memberships::find_all_by_match(conn, m.id).await?;
    let users = users_by_id(
        conn,
        members
            .iter()
            .map(|mb| mb.user_id)
            .chain(std::iter::once(m.host_id)),
    )
    .await?;

    let players: Vec<PlayerView> = members
        .iter()
        .map(|mb: &Membership| {
            let user = users.get(&mb.user_id);
            PlayerView {
                user_id: mb.user_id,
                name: name_of(&users, mb.user_id),
                avatar_url: user.and_then(|u| u.avatar_url.clone()),
                handicap: user.and_then(|u| u.handicap),
                status: mb.status,
                entry_fee_paid: mb.entry_fee_paid,
                joined_at: mb.joined_at,
            }
        })
        .collect();
    let current_players = members.iter().filter(|mb| mb.is_joined()).count();

    Ok(MatchView {
        id: m.id,
        host_id: m.host_id,
        host_name: name_of(&users, m.host_id),
        course_name: m.course_name,
        course_ref: m.course_ref,
        location: m.location,
        date: m.match_date,
        tee_time: m.tee_time,
        max_players: m.max_players,
        current_players,
        entry_fee_cents: m.entry_fee_cents,
        game_type: m.game_type,
        rules: m.rules,
        status: m.status,
        join_code: m.join_code,
        created_at: m.created_at,
        updated_at: m.updated_at,
        players,
    })
}

pub async fn match_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<MatchView, DomainError> {
    let m = matches_repo::require_match(conn, match_id).await?;
    view_of(conn, m).await
}

pub async fn scores_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<MatchScoresView, DomainError> {
    let m = matches_repo::require_match(conn, match_id).await?;
    let holes = holes::find_all_by_match(conn, match_id).await?;
    let entries = scores::find_all_by_match(conn, match_id).await?;
    let users = users_by_id(conn, entries.iter().map(|e| e.user_id)).await?;

    let mut by_hole: HashMap<i64, Vec<&HoleScore>> = HashMap::new();
    for entry in &entries {
        by_hole.entry(entry.hole_id).or_default().push(entry);
    }

    let holes: Vec<HoleView> = holes
        .into_iter()
        .map(|h: Hole| HoleView {
            scores: by_hole
                .get(&h.id)
                .map(|list| {
                    list.iter()
                        .map(|e| ScoreView {
                            user_id: e.user_id,
                            user_name: name_of(&users, e.user_id),
                            score: e.score,
                            is_skin_winner: e.is_skin_winner,
                            recorded_at: e.recorded_at,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            hole_number: h.hole_number,
            par: h.par,
            distance_yards: h.distance_yards,
            stroke_index: h.stroke_index,
            skin_value_cents: h.skin_value_cents,
            carryover_from_previous: h.carryover_from_previous,
            completed: h.completed,
        })
        .collect();

    Ok(MatchScoresView {
        match_id,
        match_status: m.status,
        total_skins: entries.iter().filter(|e| e.is_skin_winner).count(),
        completed_holes: holes.iter().filter(|h| h.completed).count(),
        holes,
    })
}

/// Hole-by-player grid for holes 1 to 18 and every joined player.
pub async fn scorecard_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<ScorecardView, DomainError> {
    let m = matches_repo::require_match(conn, match_id).await?;
    let holes = holes::find_all_by_match(conn, match_id).await?;
    let entries = scores::find_all_by_match(conn, match_id).await?;
    let players: Vec<Membership> = memberships::find_all_by_match(conn, match_id)
        .await?
        .into_iter()
        .filter(|mb| mb.status == MembershipStatus::Joined)
        .collect();
    let users = users_by_id(conn, players.iter().map(|p| p.user_id)).await?;

    let by_number: HashMap<i16, &Hole> = holes.iter().map(|h| (h.hole_number, h)).collect();
    let by_cell: HashMap<(i64, i64), &HoleScore> =
        entries.iter().map(|e| ((e.hole_id, e.user_id), e)).collect();

    let rows: Vec<ScorecardRow> = (MIN_HOLE..=MAX_HOLE)
        .map(|n| {
            let hole = by_number.get(&n).copied();
            let cells = players
                .iter()
                .map(|p| {
                    let entry = hole.and_then(|h| by_cell.get(&(h.id, p.user_id)));
                    ScorecardCell {
                        user_id: p.user_id,
                        name: name_of(&users, p.user_id),
                        strokes: entry.map(|e| i32::from(e.score)),
                        is_skin_winner: entry.is_some_and(|e| e.is_skin_winner),
                    }
                })
                .collect();
            ScorecardRow {
                hole_number: n,
                par: hole.map(|h| h.par),
                distance_yards: hole.and_then(|h| h.distance_yards),
                skin_value_cents: hole.map(|h| h.skin_value_cents),
                completed: hole.is_some_and(|h| h.completed),
                cells,
            }
        })
        .collect();

    let totals = players
        .iter()
        .map(|p| {
            let mut totals = PlayerTotals {
                user_id: p.user_id,
                name: name_of(&users, p.user_id),
                strokes: 0,
                holes_played: 0,
                skins_won: 0,
                winnings_cents: 0,
            };
            for row in &rows {
                let Some(cell) = row.cells.iter().find(|c| c.user_id == p.user_id) else {
                    continue;
                };
                if let Some(strokes) = cell.strokes {
                    totals.strokes += strokes;
                    totals.holes_played += 1;
                }
                if cell.is_skin_winner {
                    totals.skins_won += 1;
                    totals.winnings_cents += row.skin_value_cents.unwrap_or(0);
                }
            }
            totals
        })
        .collect();

    Ok(ScorecardView {
        match_id,
        course_name: m.course_name,
        rows,
        totals,
    })
}
