//! SeaORM adapter for match memberships.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::match_players::{self, MembershipStatus};

pub mod dto;

pub use dto::MembershipCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Option<match_players::Model>, DbErr> {
    match_players::Entity::find()
        .filter(match_players::Column::MatchId.eq(match_id))
        .filter(match_players::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Every membership of a match regardless of status, in join order.
pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<match_players::Model>, DbErr> {
    match_players::Entity::find()
        .filter(match_players::Column::MatchId.eq(match_id))
        .order_by_asc(match_players::Column::JoinedAt)
        .order_by_asc(match_players::Column::Id)
        .all(conn)
        .await
}

pub async fn count_joined<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<u64, DbErr> {
    match_players::Entity::find()
        .filter(match_players::Column::MatchId.eq(match_id))
        .filter(match_players::Column::Status.eq(MembershipStatus::Joined))
        .count(conn)
        .await
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MembershipCreate,
) -> Result<match_players::Model, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let membership = match_players::ActiveModel {
        id: NotSet,
        match_id: Set(dto.match_id),
        user_id: Set(dto.user_id),
        status: Set(dto.status),
        entry_fee_paid: Set(dto.entry_fee_paid),
        joined_at: Set(now),
        updated_at: Set(now),
    };

    membership.insert(conn).await
}

/// Move a membership to `status`. Re-joining also resets `joined_at`.
pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    status: MembershipStatus,
) -> Result<match_players::Model, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let membership = match_players::ActiveModel {
        id: Set(membership_id),
        match_id: NotSet,
        user_id: NotSet,
        status: Set(status),
        entry_fee_paid: NotSet,
        joined_at: if status == MembershipStatus::Joined {
            Set(now)
        } else {
            NotSet
        },
        updated_at: Set(now),
    };
    membership.update(conn).await
}
