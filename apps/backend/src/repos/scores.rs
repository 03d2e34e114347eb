//! Hole score repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::hole_scores_sea as scores_adapter;
use crate::domain::skins::ScoreEntry;
use crate::entities::hole_scores;
use crate::errors::domain::DomainError;

/// Hole score domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleScore {
    pub id: i64,
    pub hole_id: i64,
    pub user_id: i64,
    pub score: i16,
    pub is_skin_winner: bool,
    pub recorded_at: time::OffsetDateTime,
}

impl HoleScore {
    pub fn entry(&self) -> ScoreEntry {
        ScoreEntry {
            score_id: self.id,
            user_id: self.user_id,
            strokes: self.score,
        }
    }
}

impl From<hole_scores::Model> for HoleScore {
    fn from(model: hole_scores::Model) -> Self {
        Self {
            id: model.id,
            hole_id: model.hole_id,
            user_id: model.user_id,
            score: model.score,
            is_skin_winner: model.is_skin_winner,
            recorded_at: model.recorded_at,
        }
    }
}

/// Write a score once; `false` when the player already has one for the hole.
pub async fn record_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    user_id: i64,
    score: i16,
) -> Result<bool, DomainError> {
    let dto = scores_adapter::ScoreCreate {
        hole_id,
        user_id,
        score,
    };
    let inserted = scores_adapter::insert_if_absent(conn, dto).await?;
    Ok(inserted == 1)
}

pub async fn find_all_by_hole<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
) -> Result<Vec<HoleScore>, DomainError> {
    let rows = scores_adapter::find_all_by_hole(conn, hole_id).await?;
    Ok(rows.into_iter().map(HoleScore::from).collect())
}

pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<HoleScore>, DomainError> {
    let rows = scores_adapter::find_all_by_match(conn, match_id).await?;
    Ok(rows.into_iter().map(HoleScore::from).collect())
}

pub async fn mark_winner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    winner_score_id: Option<i64>,
) -> Result<(), DomainError> {
    scores_adapter::mark_winner(conn, hole_id, winner_score_id).await?;
    Ok(())
}
