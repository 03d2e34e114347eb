//! Joining and leaving matches.
//!
//! Capacity is checked after taking the match row lock (a conditional
//! `lock_version` bump), so concurrent joiners are serialized and the
//! joined count read afterwards is authoritative.

use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use crate::config::app::ScoringConfig;
use crate::domain::lifecycle;
use crate::domain::validation;
use crate::entities::match_players::MembershipStatus;
use crate::entities::matches::MatchStatus;
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, NotFoundKind};
use crate::repos::matches::{self as matches_repo, Match};
use crate::repos::{holes, memberships};
use crate::services::projector::{self, MatchView};
use crate::services::scoring;

pub async fn join(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<MatchView, DomainError> {
    let m = matches_repo::require_match(txn, match_id).await?;
    lifecycle::require_created(m.status, "join")?;

    let existing = memberships::find_membership(txn, match_id, user_id).await?;
    match existing.as_ref().map(|mb| mb.status) {
        Some(MembershipStatus::Joined) => {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyJoined,
                "You have already joined this match",
            ));
        }
        Some(MembershipStatus::Removed) => {
            return Err(DomainError::forbidden(
                ForbiddenKind::MembershipRemoved,
                "You were removed from this match",
            ));
        }
        Some(MembershipStatus::Left) | None => {}
    }

    matches_repo::touch_if_status(txn, match_id, MatchStatus::Created).await?;

    let joined = memberships::count_joined(txn, match_id).await?;
    if joined >= u64::try_from(m.max_players).unwrap_or(0) {
        return Err(DomainError::full(format!(
            "Match {match_id} is full ({joined}/{})",
            m.max_players
        )));
    }

    match existing {
        Some(left) => {
            memberships::set_status(txn, left.id, MembershipStatus::Joined).await?;
            info!(match_id, user_id, "player rejoined");
        }
        None => {
            memberships::create_membership(txn, match_id, user_id).await?;
            info!(match_id, user_id, "player joined");
        }
    }

    projector::match_view(txn, match_id).await
}

/// Resolve a six-digit code among live matches, then [`join`].
pub async fn join_by_code(
    txn: &DatabaseTransaction,
    join_code: &str,
    user_id: i64,
) -> Result<MatchView, DomainError> {
    let code = validation::join_code(join_code.trim())?;
    let m = matches_repo::find_live_by_join_code(txn, code)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Match, "No open match uses that join code")
        })?;
    join(txn, m.id, user_id).await
}

/// Leave a match; the host cannot.
///
/// In an active match the departed player's scores stop competing, so every
/// undecided hole is resolved again against the remaining roster.
pub async fn leave(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
    cfg: ScoringConfig,
) -> Result<MatchView, DomainError> {
    let m = matches_repo::require_match(txn, match_id).await?;
    let membership = memberships::find_membership(txn, match_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Membership,
                format!("You are not part of match {match_id}"),
            )
        })?;

    if !membership.is_joined() {
        return Err(DomainError::invalid_state(format!(
            "Cannot leave a match you have {}",
            match membership.status {
                MembershipStatus::Left => "already left",
                _ => "been removed from",
            }
        )));
    }
    if m.is_host(user_id) {
        return Err(DomainError::forbidden(
            ForbiddenKind::HostCannotLeave,
            "The host cannot leave; cancel the match instead",
        ));
    }

    memberships::set_status(txn, membership.id, MembershipStatus::Left).await?;
    info!(match_id, user_id, "player left");

    if m.status == MatchStatus::Active {
        resettle_open_holes(txn, &m, cfg).await?;
    }

    projector::match_view(txn, match_id).await
}

async fn resettle_open_holes(
    txn: &DatabaseTransaction,
    m: &Match,
    cfg: ScoringConfig,
) -> Result<(), DomainError> {
    let open: Vec<i64> = holes::find_all_by_match(txn, m.id)
        .await?
        .into_iter()
        .filter(|h| !h.completed)
        .map(|h| h.id)
        .collect();
    for hole_id in &open {
        scoring::resolve_hole(txn, m.id, *hole_id, cfg.resolution_policy).await?;
    }
    scoring::reprice_holes(txn, m).await?;
    debug!(match_id = m.id, holes = open.len(), "open holes resettled after leave");
    Ok(())
}
