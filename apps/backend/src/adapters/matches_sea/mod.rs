//! SeaORM adapter for the matches table.
//!
//! Every status-dependent write is a conditional update
//! (`WHERE id = ? AND status = ?`) returning the affected row count; the
//! repos layer turns a zero into `NotFound` or `InvalidState`.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::matches::{self, MatchStatus};
use crate::infra::db_errors::MATCH_NOT_FOUND_PREFIX;

pub mod dto;

pub use dto::{MatchCreate, MatchListFilter, MatchUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<matches::Model>, DbErr> {
    matches::Entity::find_by_id(match_id).one(conn).await
}

/// Like [`find_by_id`] but a missing row is a structured `DbErr::Custom`.
pub async fn require_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<matches::Model, DbErr> {
    find_by_id(conn, match_id)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("{MATCH_NOT_FOUND_PREFIX}{match_id}")))
}

/// Match holding `join_code` that is still `created` or `active`.
pub async fn find_live_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<matches::Model>, DbErr> {
    matches::Entity::find()
        .filter(matches::Column::JoinCode.eq(join_code))
        .filter(matches::Column::Status.is_in([MatchStatus::Created, MatchStatus::Active]))
        .one(conn)
        .await
}

/// Any row currently holding `join_code` (terminal matches have released theirs).
pub async fn join_code_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<bool, DbErr> {
    let n = matches::Entity::find()
        .filter(matches::Column::JoinCode.eq(join_code))
        .count(conn)
        .await?;
    Ok(n > 0)
}

/// Insert a match unless its join code is taken.
///
/// Returns `None` when the code collided (`ON CONFLICT DO NOTHING`), which
/// keeps a Postgres transaction usable for the next attempt.
pub async fn insert_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MatchCreate,
) -> Result<Option<matches::Model>, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = matches::ActiveModel {
        id: NotSet,
        host_id: Set(dto.host_id),
        course_name: Set(dto.course_name),
        course_ref: Set(dto.course_ref),
        location: Set(dto.location),
        match_date: Set(dto.match_date),
        tee_time: Set(dto.tee_time),
        max_players: Set(dto.max_players),
        entry_fee_cents: Set(dto.entry_fee_cents),
        game_type: Set(dto.game_type),
        rules: Set(Some(dto.rules)),
        status: Set(MatchStatus::Created),
        join_code: Set(Some(dto.join_code)),
        created_at: Set(now),
        updated_at: Set(now),
        lock_version: Set(1),
    };

    let inserted = matches::Entity::insert(active)
        .on_conflict(
            OnConflict::column(matches::Column::JoinCode)
                .do_nothing()
                .to_owned(),
        )
        .exec(conn)
        .await;

    match inserted {
        Ok(res) => find_by_id(conn, res.last_insert_id).await,
        Err(DbErr::RecordNotInserted) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite the editable columns while the match is still `created`.
pub async fn update_if_created<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    dto: MatchUpdate,
) -> Result<u64, DbErr> {
    let res = matches::Entity::update_many()
        .col_expr(matches::Column::CourseName, Expr::value(dto.course_name))
        .col_expr(matches::Column::Location, Expr::value(dto.location))
        .col_expr(matches::Column::MatchDate, Expr::value(dto.match_date))
        .col_expr(matches::Column::TeeTime, Expr::value(dto.tee_time))
        .col_expr(matches::Column::MaxPlayers, Expr::value(dto.max_players))
        .col_expr(
            matches::Column::EntryFeeCents,
            Expr::value(dto.entry_fee_cents),
        )
        .col_expr(matches::Column::GameType, Expr::value(dto.game_type))
        .col_expr(matches::Column::Rules, Expr::value(dto.rules))
        .col_expr(
            matches::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .col_expr(
            matches::Column::LockVersion,
            Expr::col(matches::Column::LockVersion).add(1),
        )
        .filter(matches::Column::Id.eq(match_id))
        .filter(matches::Column::Status.eq(MatchStatus::Created))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Compare-and-swap the status; terminal targets also release the join code.
pub async fn transition_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    expected: MatchStatus,
    next: MatchStatus,
) -> Result<u64, DbErr> {
    let mut update = matches::Entity::update_many()
        .col_expr(matches::Column::Status, Expr::value(next))
        .col_expr(
            matches::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .col_expr(
            matches::Column::LockVersion,
            Expr::col(matches::Column::LockVersion).add(1),
        );
    if matches!(next, MatchStatus::Completed | MatchStatus::Cancelled) {
        update = update.col_expr(matches::Column::JoinCode, Expr::value(Option::<String>::None));
    }

    let res = update
        .filter(matches::Column::Id.eq(match_id))
        .filter(matches::Column::Status.eq(expected))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Bump `lock_version` if the match is in `expected`; takes the row lock.
pub async fn touch_if_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    expected: MatchStatus,
) -> Result<u64, DbErr> {
    let res = matches::Entity::update_many()
        .col_expr(
            matches::Column::LockVersion,
            Expr::col(matches::Column::LockVersion).add(1),
        )
        .filter(matches::Column::Id.eq(match_id))
        .filter(matches::Column::Status.eq(expected))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_if_created<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<u64, DbErr> {
    let res = matches::Entity::delete_many()
        .filter(matches::Column::Id.eq(match_id))
        .filter(matches::Column::Status.eq(MatchStatus::Created))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// One page of matches, newest first, plus the total matching the filter.
pub async fn list_matches<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: MatchListFilter,
) -> Result<(Vec<matches::Model>, u64), DbErr> {
    let mut query = matches::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(matches::Column::Status.eq(status));
    }
    if let Some(date) = filter.match_date {
        query = query.filter(matches::Column::MatchDate.eq(date));
    }

    let paginator = query
        .order_by_desc(matches::Column::CreatedAt)
        .order_by_desc(matches::Column::Id)
        .paginate(conn, filter.limit.max(1));
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(filter.page.saturating_sub(1)).await?;
    Ok((rows, total))
}
