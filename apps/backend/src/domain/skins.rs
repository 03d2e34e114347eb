//! Skins resolution and stake pricing.
//!
//! Everything here is pure: callers load the current hole/score rows, ask for
//! an outcome or a price, and persist the full result. Running the same
//! inputs twice yields the same answer, so resolution can be re-triggered
//! freely.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// When a hole may be decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Decide on every recorded score; later scores may overturn the result.
    Provisional,
    /// Wait until every joined player has a score on the hole.
    #[default]
    AllPlayersScored,
}

impl ResolutionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionPolicy::Provisional => "provisional",
            ResolutionPolicy::AllPlayersScored => "all_players_scored",
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "provisional" => Ok(ResolutionPolicy::Provisional),
            "all_players_scored" => Ok(ResolutionPolicy::AllPlayersScored),
            other => Err(DomainError::validation(
                ValidationKind::Other("ResolutionPolicy".into()),
                format!("unknown resolution policy '{other}'"),
            )),
        }
    }
}

/// One recorded score on a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub score_id: i64,
    pub user_id: i64,
    pub strokes: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleOutcome {
    /// Not decidable yet.
    Pending,
    /// Tie at the minimum; the skin carries to the next hole.
    Carryover,
    /// Unique minimum.
    Won { score_id: i64, user_id: i64 },
}

impl HoleOutcome {
    pub fn completed(self) -> bool {
        matches!(self, HoleOutcome::Won { .. })
    }

    pub fn carryover(self) -> bool {
        matches!(self, HoleOutcome::Carryover)
    }

    pub fn winner_score_id(self) -> Option<i64> {
        match self {
            HoleOutcome::Won { score_id, .. } => Some(score_id),
            _ => None,
        }
    }
}

/// Decide a hole from all of its score entries.
///
/// `joined` holds the user ids currently joined to the match. Entries from
/// anyone else are kept on the card but do not compete for the skin.
pub fn resolve(entries: &[ScoreEntry], joined: &[i64], policy: ResolutionPolicy) -> HoleOutcome {
    let live: Vec<&ScoreEntry> = entries
        .iter()
        .filter(|e| joined.contains(&e.user_id))
        .collect();
    if live.is_empty() {
        return HoleOutcome::Pending;
    }
    if policy == ResolutionPolicy::AllPlayersScored
        && !joined
            .iter()
            .all(|id| live.iter().any(|e| e.user_id == *id))
    {
        return HoleOutcome::Pending;
    }

    let Some(min) = live.iter().map(|e| e.strokes).min() else {
        return HoleOutcome::Pending;
    };
    let mut winners = live.iter().filter(|e| e.strokes == min);

    match (winners.next(), winners.next()) {
        (Some(only), None) => HoleOutcome::Won {
            score_id: only.score_id,
            user_id: only.user_id,
        },
        (Some(_), Some(_)) => HoleOutcome::Carryover,
        (None, _) => HoleOutcome::Pending,
    }
}

/// Stake-relevant view of a stored hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleState {
    pub hole_number: i16,
    pub carryover: bool,
    pub completed: bool,
}

impl HoleState {
    fn carrying(&self) -> bool {
        self.carryover && !self.completed
    }
}

/// Value of hole `hole_number`: `base * (1 + k)` where `k` counts the
/// consecutive existing holes right before it that are carrying over.
pub fn stake_for_hole(
    base_cents: i64,
    hole_number: i16,
    holes: &[HoleState],
    carryover_enabled: bool,
) -> i64 {
    if !carryover_enabled {
        return base_cents;
    }

    let mut k: i64 = 0;
    let mut prev = hole_number - 1;
    while prev >= 1 {
        match holes.iter().find(|h| h.hole_number == prev) {
            Some(h) if h.carrying() => {
                k += 1;
                prev -= 1;
            }
            _ => break,
        }
    }

    base_cents.saturating_mul(1 + k)
}

/// Stake for every hole in `holes`, as `(hole_number, cents)`.
pub fn price_holes(base_cents: i64, holes: &[HoleState], carryover_enabled: bool) -> Vec<(i16, i64)> {
    holes
        .iter()
        .map(|h| {
            (
                h.hole_number,
                stake_for_hole(base_cents, h.hole_number, holes, carryover_enabled),
            )
        })
        .collect()
}
