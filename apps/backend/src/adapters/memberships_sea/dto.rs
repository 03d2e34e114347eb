//! DTOs for memberships_sea adapter.

use crate::entities::match_players::MembershipStatus;

/// DTO for creating a match membership.
#[derive(Debug, Clone)]
pub struct MembershipCreate {
    pub match_id: i64,
    pub user_id: i64,
    pub status: MembershipStatus,
    pub entry_fee_paid: bool,
}

impl MembershipCreate {
    /// A freshly joined player who has not paid yet.
    pub fn joined(match_id: i64, user_id: i64) -> Self {
        Self {
            match_id,
            user_id,
            status: MembershipStatus::Joined,
            entry_fee_paid: false,
        }
    }
}
