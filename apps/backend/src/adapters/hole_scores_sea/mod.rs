//! SeaORM adapter for per-player hole scores.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, NotSet, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use crate::entities::{hole_scores, holes};

pub mod dto;

pub use dto::ScoreCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// `INSERT … ON CONFLICT (hole_id, user_id) DO NOTHING`; returns rows inserted.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ScoreCreate,
) -> Result<u64, DbErr> {
    let entry = hole_scores::ActiveModel {
        id: NotSet,
        hole_id: Set(dto.hole_id),
        user_id: Set(dto.user_id),
        score: Set(dto.score),
        is_skin_winner: Set(false),
        recorded_at: Set(time::OffsetDateTime::now_utc()),
    };

    hole_scores::Entity::insert(entry)
        .on_conflict(
            OnConflict::columns([hole_scores::Column::HoleId, hole_scores::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

pub async fn find_all_by_hole<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
) -> Result<Vec<hole_scores::Model>, DbErr> {
    hole_scores::Entity::find()
        .filter(hole_scores::Column::HoleId.eq(hole_id))
        .order_by_asc(hole_scores::Column::RecordedAt)
        .order_by_asc(hole_scores::Column::Id)
        .all(conn)
        .await
}

/// Every score entry of a match across all holes.
pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<hole_scores::Model>, DbErr> {
    hole_scores::Entity::find()
        .join(JoinType::InnerJoin, hole_scores::Relation::Hole.def())
        .filter(holes::Column::MatchId.eq(match_id))
        .order_by_asc(hole_scores::Column::HoleId)
        .order_by_asc(hole_scores::Column::RecordedAt)
        .order_by_asc(hole_scores::Column::Id)
        .all(conn)
        .await
}

/// Rewrite `is_skin_winner` for every entry of the hole: only `winner` (if any) is true.
pub async fn mark_winner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    winner: Option<i64>,
) -> Result<(), DbErr> {
    let mut clear = hole_scores::Entity::update_many()
        .col_expr(hole_scores::Column::IsSkinWinner, Expr::value(false))
        .filter(hole_scores::Column::HoleId.eq(hole_id))
        .filter(hole_scores::Column::IsSkinWinner.eq(true));
    if let Some(winner_id) = winner {
        clear = clear.filter(hole_scores::Column::Id.ne(winner_id));
    }
    clear.exec(conn).await?;

    if let Some(winner_id) = winner {
        hole_scores::Entity::update_many()
            .col_expr(hole_scores::Column::IsSkinWinner, Expr::value(true))
            .filter(hole_scores::Column::Id.eq(winner_id))
            .filter(hole_scores::Column::HoleId.eq(hole_id))
            .exec(conn)
            .await?;
    }
    Ok(())
}
