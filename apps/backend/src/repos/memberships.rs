//! Membership repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::memberships_sea as memberships_adapter;
use crate::entities::match_players::{self, MembershipStatus};
use crate::errors::domain::DomainError;

/// Match membership domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: i64,
    pub match_id: i64,
    pub user_id: i64,
    pub status: MembershipStatus,
    pub entry_fee_paid: bool,
    pub joined_at: time::OffsetDateTime,
}

impl Membership {
    pub fn is_joined(&self) -> bool {
        self.status == MembershipStatus::Joined
    }
}

impl From<match_players::Model> for Membership {
    fn from(model: match_players::Model) -> Self {
        Self {
            id: model.id,
            match_id: model.match_id,
            user_id: model.user_id,
            status: model.status,
            entry_fee_paid: model.entry_fee_paid,
            joined_at: model.joined_at,
        }
    }
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Option<Membership>, DomainError> {
    let row = memberships_adapter::find_membership(conn, match_id, user_id).await?;
    Ok(row.map(Membership::from))
}

pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<Membership>, DomainError> {
    let rows = memberships_adapter::find_all_by_match(conn, match_id).await?;
    Ok(rows.into_iter().map(Membership::from).collect())
}

/// User ids of the players currently joined to the match.
pub async fn joined_user_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<i64>, DomainError> {
    let members = find_all_by_match(conn, match_id).await?;
    Ok(members
        .into_iter()
        .filter(Membership::is_joined)
        .map(|m| m.user_id)
        .collect())
}

pub async fn count_joined<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<u64, DomainError> {
    Ok(memberships_adapter::count_joined(conn, match_id).await?)
}

/// Insert a `joined` membership with the fee unpaid.
pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Membership, DomainError> {
    let dto = memberships_adapter::MembershipCreate::joined(match_id, user_id);
    let row = memberships_adapter::create_membership(conn, dto).await?;
    Ok(Membership::from(row))
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    status: MembershipStatus,
) -> Result<Membership, DomainError> {
    let row = memberships_adapter::set_status(conn, membership_id, status).await?;
    Ok(Membership::from(row))
}
