//! SeaORM adapter for holes.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::entities::holes;

pub mod dto;

pub use dto::HoleCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// `INSERT … ON CONFLICT (match_id, hole_number) DO NOTHING`; returns rows inserted.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: HoleCreate,
) -> Result<u64, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let hole = holes::ActiveModel {
        id: NotSet,
        match_id: Set(dto.match_id),
        hole_number: Set(dto.hole_number),
        par: Set(dto.par),
        distance_yards: Set(dto.distance_yards),
        stroke_index: Set(dto.stroke_index),
        skin_value_cents: Set(dto.skin_value_cents),
        carryover_from_previous: Set(false),
        completed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    holes::Entity::insert(hole)
        .on_conflict(
            OnConflict::columns([holes::Column::MatchId, holes::Column::HoleNumber])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

pub async fn find_by_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    hole_number: i16,
) -> Result<Option<holes::Model>, DbErr> {
    holes::Entity::find()
        .filter(holes::Column::MatchId.eq(match_id))
        .filter(holes::Column::HoleNumber.eq(hole_number))
        .one(conn)
        .await
}

/// Holes of a match ordered by number.
pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<holes::Model>, DbErr> {
    holes::Entity::find()
        .filter(holes::Column::MatchId.eq(match_id))
        .order_by_asc(holes::Column::HoleNumber)
        .all(conn)
        .await
}

pub async fn update_resolution<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    carryover: bool,
    completed: bool,
) -> Result<u64, DbErr> {
    let res = holes::Entity::update_many()
        .col_expr(holes::Column::CarryoverFromPrevious, Expr::value(carryover))
        .col_expr(holes::Column::Completed, Expr::value(completed))
        .col_expr(
            holes::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(holes::Column::Id.eq(hole_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn update_stake<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    skin_value_cents: i64,
) -> Result<u64, DbErr> {
    let res = holes::Entity::update_many()
        .col_expr(holes::Column::SkinValueCents, Expr::value(skin_value_cents))
        .col_expr(
            holes::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(holes::Column::Id.eq(hole_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
