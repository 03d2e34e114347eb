//! Score recording, skin resolution and stake repricing.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::holes_sea::HoleCreate;
use crate::config::app::ScoringConfig;
use crate::domain::lifecycle;
use crate::domain::skins::{self, HoleOutcome, HoleState, ResolutionPolicy};
use crate::domain::validation::{self, DEFAULT_PAR};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind};
use crate::repos::holes::{self, Hole};
use crate::repos::matches::{self as matches_repo, Match};
use crate::repos::{memberships, scores};
use crate::services::projector::{self, MatchScoresView};

fn default_par() -> i16 {
    DEFAULT_PAR
}

/// Body of `POST /api/matches/{id}/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScoreSubmission {
    pub hole_number: i16,
    pub score: i16,
    /// Used only when this submission creates the hole
    #[serde(default = "default_par")]
    pub par: i16,
}

/// Record one player's strokes on one hole, then resolve and reprice.
pub async fn record_score(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
    submission: ScoreSubmission,
    cfg: ScoringConfig,
) -> Result<MatchScoresView, DomainError> {
    let hole_number = validation::hole_number(submission.hole_number)?;
    let strokes = validation::score(submission.score)?;
    let par = validation::par(submission.par)?;

    let m = matches_repo::require_match(txn, match_id).await?;
    lifecycle::require_active(m.status, "record scores")?;

    let is_player = memberships::find_membership(txn, match_id, user_id)
        .await?
        .is_some_and(|mb| mb.is_joined());
    if !is_player {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotAMember,
            "Only joined players can record scores",
        ));
    }

    let hole = ensure_hole(txn, &m, hole_number, par).await?;

    if !scores::record_if_absent(txn, hole.id, user_id, strokes).await? {
        return Err(DomainError::conflict(
            ConflictKind::ScoreAlreadyRecorded,
            format!("Score already recorded for hole {hole_number}"),
        ));
    }
    info!(match_id, user_id, hole_number, strokes, "score recorded");

    resolve_hole(txn, match_id, hole.id, cfg.resolution_policy).await?;
    reprice_holes(txn, &m).await?;

    projector::scores_view(txn, match_id).await
}

/// Create the hole on first use, priced from the holes already present.
async fn ensure_hole(
    txn: &DatabaseTransaction,
    m: &Match,
    hole_number: i16,
    par: i16,
) -> Result<Hole, DomainError> {
    if let Some(existing) = holes::find_by_number(txn, m.id, hole_number).await? {
        return Ok(existing);
    }

    let existing: Vec<HoleState> = holes::find_all_by_match(txn, m.id)
        .await?
        .iter()
        .map(Hole::state)
        .collect();
    let stake = skins::stake_for_hole(
        m.entry_fee_cents,
        hole_number,
        &existing,
        m.parsed_rules()?.carryover_enabled(),
    );

    let (hole, created) = holes::ensure_hole(
        txn,
        HoleCreate {
            match_id: m.id,
            hole_number,
            par,
            distance_yards: None,
            stroke_index: None,
            skin_value_cents: stake,
        },
    )
    .await?;
    if created {
        debug!(match_id = m.id, hole_number, stake, "hole created");
    }
    Ok(hole)
}

/// Recompute the outcome of one hole from all of its entries and write it.
///
/// Only scores of players still joined take part. Writes the full outcome every time, so calling it again is harmless.
pub async fn resolve_hole<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    hole_id: i64,
    policy: ResolutionPolicy,
) -> Result<HoleOutcome, DomainError> {
    let entries: Vec<_> = scores::find_all_by_hole(conn, hole_id)
        .await?
        .iter()
        .map(|s| s.entry())
        .collect();
    let joined = memberships::joined_user_ids(conn, match_id).await?;
    let outcome = skins::resolve(&entries, &joined, policy);

    holes::set_resolution(conn, hole_id, outcome.carryover(), outcome.completed()).await?;
    scores::mark_winner(conn, hole_id, outcome.winner_score_id()).await?;

    match outcome {
        HoleOutcome::Won { user_id, .. } => {
            info!(match_id, hole_id, winner = user_id, "skin won")
        }
        HoleOutcome::Carryover => info!(match_id, hole_id, "hole tied; skin carries over"),
        HoleOutcome::Pending => debug!(match_id, hole_id, "hole pending"),
    }
    Ok(outcome)
}

/// Bring every hole's `skin_value_cents` in line with the current carryovers.
///
/// Returns the number of holes whose stake changed.
pub async fn reprice_holes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    m: &Match,
) -> Result<usize, DomainError> {
    let current = holes::find_all_by_match(conn, m.id).await?;
    let states: Vec<HoleState> = current.iter().map(Hole::state).collect();
    let priced = skins::price_holes(
        m.entry_fee_cents,
        &states,
        m.parsed_rules()?.carryover_enabled(),
    );

    let mut changed = 0;
    for (hole, (_, stake)) in current.iter().zip(priced) {
        if hole.skin_value_cents != stake {
            holes::set_stake(conn, hole.id, stake).await?;
            changed += 1;
        }
    }
    if changed > 0 {
        debug!(match_id = m.id, changed, "stakes repriced");
    }
    Ok(changed)
}
