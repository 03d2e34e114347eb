//! SeaORM adapter for users.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::users;

pub mod dto;

pub use dto::UserCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

fn active_model(dto: UserCreate) -> users::ActiveModel {
    let now = time::OffsetDateTime::now_utc();
    users::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        display_name: Set(dto.display_name),
        email: Set(dto.email),
        avatar_url: Set(dto.avatar_url),
        handicap: Set(dto.handicap),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, DbErr> {
    active_model(dto).insert(conn).await
}

/// Insert by `sub` unless present; returns the row and whether it was created.
pub async fn ensure_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<(users::Model, bool), DbErr> {
    let sub = dto.sub.clone();

    let rows = users::Entity::insert(active_model(dto))
        .on_conflict(
            OnConflict::column(users::Column::Sub)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let user = find_by_sub(conn, &sub)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("users.sub not found".to_string()))?;

    Ok((user, rows == 1))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<users::Model>, DbErr> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .filter(users::Column::Id.is_in(user_ids.iter().copied()))
        .all(conn)
        .await
}
