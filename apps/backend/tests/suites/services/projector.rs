use skins_backend::config::app::ScoringConfig;
use skins_backend::db::require_db;
use skins_backend::db::txn::SharedTxn;
use skins_backend::domain::skins::ResolutionPolicy;
use skins_backend::entities::match_players::MembershipStatus;
use skins_backend::errors::domain::{DomainError, NotFoundKind};
use skins_backend::services::{projector, roster};
use skins_backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{record, seed_active_match, seed_match_with_players};

const CFG: ScoringConfig = ScoringConfig {
    resolution_policy: ResolutionPolicy::AllPlayersScored,
};

#[tokio::test]
async fn match_view_lists_every_membership() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Ada", "Bea"], 0).await?;
    roster::leave(txn, view.id, players[2].id, CFG).await?;

    let view = projector::match_view(txn, view.id).await?;
    assert_eq!(view.current_players, 2);
    assert_eq!(view.players.len(), 3);
    let names: Vec<&str> = view.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["host", "Ada", "Bea"]);
    assert_eq!(view.players[2].status, MembershipStatus::Left);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn scorecard_has_eighteen_rows_and_joined_players_only() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_active_match(txn, &["Ada", "Bea"], 10).await?;
    let (host, ada, bea) = (players[0].id, players[1].id, players[2].id);
    roster::leave(txn, view.id, bea, CFG).await?;

    // Two joined players remain: hole 1 ties, hole 2 goes to Ada.
    record(txn, view.id, host, 1, 4, CFG).await?;
    record(txn, view.id, ada, 1, 4, CFG).await?;
    record(txn, view.id, host, 2, 5, CFG).await?;
    record(txn, view.id, ada, 2, 3, CFG).await?;

    let card = projector::scorecard_view(txn, view.id).await?;
    assert_eq!(card.match_id, view.id);
    assert_eq!(card.course_name, "Riverside Links");
    assert_eq!(card.rows.len(), 18);
    assert!(card.rows.iter().all(|r| r.cells.len() == 2));

    let row1 = &card.rows[0];
    assert_eq!(row1.hole_number, 1);
    assert_eq!(row1.par, Some(4));
    assert!(!row1.completed);
    assert_eq!(row1.cells[0].strokes, Some(4));

    let row2 = &card.rows[1];
    assert!(row2.completed);
    assert_eq!(row2.skin_value_cents, Some(20));
    let ada_cell = row2.cells.iter().find(|c| c.user_id == ada).unwrap();
    assert!(ada_cell.is_skin_winner);
    assert_eq!(ada_cell.name, "Ada");

    let row3 = &card.rows[2];
    assert_eq!(row3.par, None);
    assert!(row3.cells.iter().all(|c| c.strokes.is_none()));

    let ada_totals = card.totals.iter().find(|t| t.user_id == ada).unwrap();
    assert_eq!(ada_totals.strokes, 7);
    assert_eq!(ada_totals.holes_played, 2);
    assert_eq!(ada_totals.skins_won, 1);
    assert_eq!(ada_totals.winnings_cents, 20);
    let host_totals = card.totals.iter().find(|t| t.user_id == host).unwrap();
    assert_eq!(host_totals.strokes, 9);
    assert_eq!(host_totals.skins_won, 0);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn scores_view_orders_holes_by_number() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_active_match(txn, &[], 10).await?;
    for n in [9, 2, 14] {
        record(txn, view.id, players[0].id, n, 4, CFG).await?;
    }

    let scores = projector::scores_view(txn, view.id).await?;
    let numbers: Vec<i16> = scores.holes.iter().map(|h| h.hole_number).collect();
    assert_eq!(numbers, vec![2, 9, 14]);
    // A lone player wins every hole they finish.
    assert_eq!(scores.total_skins, 3);
    assert_eq!(scores.holes[0].scores[0].user_name, "host");

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn views_of_missing_matches_are_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    for err in [
        projector::match_view(txn, 31_337).await.unwrap_err(),
        projector::scores_view(txn, 31_337).await.unwrap_err(),
        projector::scorecard_view(txn, 31_337).await.unwrap_err(),
    ] {
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Match, _)));
    }

    shared.rollback().await?;
    Ok(())
}
