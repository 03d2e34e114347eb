use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend};
use skins_backend::config::app::ScoringConfig;
use skins_backend::db::require_db;
use skins_backend::db::txn::SharedTxn;
use skins_backend::entities::matches::{GameType, MatchStatus};
use skins_backend::errors::domain::{DomainError, ForbiddenKind, NotFoundKind, ValidationKind};
use skins_backend::services::matches::{self, UpdateMatchInput};
use skins_backend::services::roster;
use skins_backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{create_test_match, create_test_user, seed_match_with_players};

#[tokio::test]
async fn create_auto_joins_host_and_issues_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "Hannah").await?;
    let view = create_test_match(txn, host.id, 4, 1000).await?;

    assert_eq!(view.status, MatchStatus::Created);
    assert_eq!(view.host_id, host.id);
    assert_eq!(view.host_name, "Hannah");
    assert_eq!(view.current_players, 1);
    assert_eq!(view.players[0].user_id, host.id);
    assert!(!view.players[0].entry_fee_paid);
    let code = view.join_code.clone().expect("created match has a join code");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    shared.rollback().await?;
    Ok(())
}

/// Make every membership insert on this transaction fail.
async fn block_membership_inserts(txn: &DatabaseTransaction) -> Result<(), AppError> {
    match txn.get_database_backend() {
        DbBackend::Postgres => {
            txn.execute_unprepared(
                "CREATE FUNCTION reject_membership() RETURNS trigger AS $$ \
                 BEGIN RAISE EXCEPTION 'membership insert blocked'; END $$ LANGUAGE plpgsql",
            )
            .await?;
            txn.execute_unprepared(
                "CREATE TRIGGER reject_membership BEFORE INSERT ON match_players \
                 FOR EACH ROW EXECUTE FUNCTION reject_membership()",
            )
            .await?;
        }
        _ => {
            txn.execute_unprepared(
                "CREATE TRIGGER reject_membership BEFORE INSERT ON match_players \
                 BEGIN SELECT RAISE(ABORT, 'membership insert blocked'); END",
            )
            .await?;
        }
    }
    Ok(())
}

#[tokio::test]
async fn match_survives_a_failed_host_membership() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "Hannah").await?;
    block_membership_inserts(txn).await?;

    let created = create_test_match(txn, host.id, 4, 1000).await?;
    assert_eq!(created.status, MatchStatus::Created);
    assert_eq!(created.current_players, 0);

    let fetched = matches::get_match(txn, created.id).await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.host_id, host.id);
    assert_eq!(fetched.current_players, 0);
    assert!(fetched.players.is_empty());
    assert!(fetched.join_code.is_some());

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn host_drives_match_to_completion() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Bo"], 500).await?;
    let host = players[0].id;

    let started = matches::start_match(txn, view.id, host).await?;
    assert_eq!(started.status, MatchStatus::Active);
    assert!(started.join_code.is_some());

    let completed = matches::complete_match(txn, view.id, host).await?;
    assert_eq!(completed.status, MatchStatus::Completed);
    assert_eq!(completed.join_code, None, "terminal matches release their code");

    // Terminal: nothing moves it any more.
    for result in [
        matches::start_match(txn, view.id, host).await,
        matches::complete_match(txn, view.id, host).await,
        matches::cancel_match(txn, view.id, host).await,
    ] {
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn complete_requires_active() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    let view = create_test_match(txn, host.id, 4, 0).await?;

    let err = matches::complete_match(txn, view.id, host.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));
    assert_eq!(matches::get_match(txn, view.id).await?.status, MatchStatus::Created);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn cancel_from_created_and_active() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;

    let created = create_test_match(txn, host.id, 4, 0).await?;
    let cancelled = matches::cancel_match(txn, created.id, host.id).await?;
    assert_eq!(cancelled.status, MatchStatus::Cancelled);
    assert_eq!(cancelled.join_code, None);

    let active = create_test_match(txn, host.id, 4, 0).await?;
    matches::start_match(txn, active.id, host.id).await?;
    let cancelled = matches::cancel_match(txn, active.id, host.id).await?;
    assert_eq!(cancelled.status, MatchStatus::Cancelled);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn cancel_rejects_non_host_then_completed_match() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Guest"], 0).await?;
    let (host, guest) = (players[0].id, players[1].id);

    let err = matches::cancel_match(txn, view.id, guest).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotHost, _)
    ));

    matches::start_match(txn, view.id, host).await?;
    matches::complete_match(txn, view.id, host).await?;

    let err = matches::cancel_match(txn, view.id, host).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn host_check_comes_before_state_check() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Guest"], 0).await?;
    let (host, guest) = (players[0].id, players[1].id);
    matches::cancel_match(txn, view.id, host).await?;

    // A non-host hears NotHost even though the match is terminal.
    let err = matches::start_match(txn, view.id, guest).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotHost, _)
    ));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn missing_match_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    for err in [
        matches::start_match(txn, 987_654, host.id).await.unwrap_err(),
        matches::cancel_match(txn, 987_654, host.id).await.unwrap_err(),
        matches::get_match(txn, 987_654).await.unwrap_err(),
    ] {
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Match, _)));
    }

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn update_edits_fields_while_created() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    let view = create_test_match(txn, host.id, 4, 1000).await?;

    let updated = matches::update_match(
        txn,
        view.id,
        host.id,
        UpdateMatchInput {
            course_name: Some("  Harbor Hills ".to_string()),
            location: Some(None),
            tee_time: Some("10:15".to_string()),
            entry_fee_cents: Some(2500),
            ..Default::default()
        },
    )
    .await?;

    assert_eq!(updated.course_name, "Harbor Hills");
    assert_eq!(updated.location, None);
    assert_eq!(updated.tee_time, "10:15");
    assert_eq!(updated.entry_fee_cents, 2500);
    assert_eq!(updated.date, view.date);
    assert_eq!(updated.max_players, 4);
    assert_eq!(updated.status, MatchStatus::Created);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn update_switching_game_type_reparses_rules() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    let view = create_test_match(txn, host.id, 4, 0).await?;

    let updated = matches::update_match(
        txn,
        view.id,
        host.id,
        UpdateMatchInput {
            game_type: Some(GameType::Wolf),
            rules: Some(serde_json::json!({ "lone_wolf_multiplier": 3 })),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.game_type, GameType::Wolf);
    assert_eq!(updated.rules["lone_wolf_multiplier"], 3);

    let err = matches::update_match(
        txn,
        view.id,
        host.id,
        UpdateMatchInput {
            rules: Some(serde_json::json!({ "lone_wolf_multiplier": "lots" })),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::Rules, _)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn update_rejects_non_host_started_and_undersized() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Ann", "Ben"], 0).await?;
    let (host, guest) = (players[0].id, players[1].id);

    let shrink = UpdateMatchInput {
        max_players: Some(2),
        ..Default::default()
    };
    let err = matches::update_match(txn, view.id, host, shrink.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MatchInput, _)
    ));

    let err = matches::update_match(txn, view.id, guest, UpdateMatchInput::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotHost, _)
    ));

    matches::start_match(txn, view.id, host).await?;
    let err = matches::update_match(
        txn,
        view.id,
        host,
        UpdateMatchInput {
            max_players: Some(6),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn delete_only_while_created() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let (view, players) = seed_match_with_players(txn, &["Cy"], 0).await?;
    let host = players[0].id;

    let err = matches::delete_match(txn, view.id, players[1].id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotHost, _)
    ));

    matches::delete_match(txn, view.id, host).await?;
    let err = matches::get_match(txn, view.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Match, _)));

    let started = create_test_match(txn, host, 4, 0).await?;
    matches::start_match(txn, started.id, host).await?;
    let err = matches::delete_match(txn, started.id, host).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn roster_changes_never_move_status() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    let view = create_test_match(txn, host.id, 2, 0).await?;
    let guest = create_test_user(txn, "guest").await?;

    let full = roster::join(txn, view.id, guest.id).await?;
    assert_eq!(full.current_players, 2);
    assert_eq!(full.status, MatchStatus::Created);

    let after_leave = roster::leave(txn, view.id, guest.id, ScoringConfig::default()).await?;
    assert_eq!(after_leave.status, MatchStatus::Created);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first_and_filtered() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let txn = shared.transaction();

    let host = create_test_user(txn, "host").await?;
    let first = create_test_match(txn, host.id, 4, 0).await?;
    let second = create_test_match(txn, host.id, 4, 0).await?;
    let third = create_test_match(txn, host.id, 4, 0).await?;
    matches::start_match(txn, second.id, host.id).await?;

    let page = matches::list_matches(txn, Default::default()).await?;
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    let ids: Vec<i64> = page.matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let active = matches::list_matches(
        txn,
        matches::ListMatchesQuery {
            status: Some(MatchStatus::Active),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(active.total, 1);
    assert_eq!(active.matches[0].id, second.id);

    let paged = matches::list_matches(
        txn,
        matches::ListMatchesQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(paged.total, 3);
    assert_eq!(paged.matches.len(), 1);
    assert_eq!(paged.matches[0].id, first.id);

    let err = matches::list_matches(
        txn,
        matches::ListMatchesQuery {
            limit: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::Pagination, _)
    ));

    shared.rollback().await?;
    Ok(())
}
