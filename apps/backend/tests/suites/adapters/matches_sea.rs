use backend_test_support::unique_helpers::unique_sub;
use sea_orm::DatabaseTransaction;
use serde_json::json;
use skins_backend::adapters::matches_sea::{self, MatchCreate, MatchListFilter};
use skins_backend::adapters::users_sea::{self, UserCreate};
use skins_backend::db::txn::with_txn;
use skins_backend::entities::matches::{GameType, MatchStatus};
use skins_backend::AppError;

use crate::support::build_test_state;

async fn host(txn: &DatabaseTransaction) -> Result<i64, AppError> {
    let user = users_sea::create_user(txn, UserCreate::new(unique_sub("host"), "Host")).await?;
    Ok(user.id)
}

fn new_match(host_id: i64, join_code: &str) -> MatchCreate {
    MatchCreate {
        host_id,
        course_name: "Riverside Links".to_string(),
        course_ref: None,
        location: Some("Portland, OR".to_string()),
        match_date: "2026-06-14".to_string(),
        tee_time: "08:30".to_string(),
        max_players: 4,
        entry_fee_cents: 500,
        game_type: GameType::Standard,
        rules: json!({}),
        join_code: join_code.to_string(),
    }
}

#[tokio::test]
async fn insert_skips_taken_join_codes() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host_id = host(txn).await?;

            let first = matches_sea::insert_match(txn, new_match(host_id, "314159"))
                .await?
                .expect("first insert lands");
            assert_eq!(first.status, MatchStatus::Created);
            assert_eq!(first.join_code.as_deref(), Some("314159"));
            assert_eq!(first.lock_version, 1);

            let clash = matches_sea::insert_match(txn, new_match(host_id, "314159")).await?;
            assert!(clash.is_none(), "duplicate code must not insert");

            let retry =
                matches_sea::insert_match(txn, new_match(host_id, "314159").with_join_code("271828"))
                    .await?;
            assert!(retry.is_some(), "transaction stays usable after a clash");

            assert!(matches_sea::join_code_exists(txn, "314159").await?);
            assert!(!matches_sea::join_code_exists(txn, "999999").await?);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn transition_is_compare_and_swap() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host_id = host(txn).await?;
            let m = matches_sea::insert_match(txn, new_match(host_id, "161803"))
                .await?
                .expect("inserted");

            let rows =
                matches_sea::transition_status(txn, m.id, MatchStatus::Active, MatchStatus::Completed)
                    .await?;
            assert_eq!(rows, 0, "wrong expected status changes nothing");

            let rows =
                matches_sea::transition_status(txn, m.id, MatchStatus::Created, MatchStatus::Active)
                    .await?;
            assert_eq!(rows, 1);
            let active = matches_sea::require_match(txn, m.id).await?;
            assert_eq!(active.status, MatchStatus::Active);
            assert_eq!(active.join_code.as_deref(), Some("161803"));
            assert_eq!(active.lock_version, 2);

            let found = matches_sea::find_live_by_join_code(txn, "161803").await?;
            assert_eq!(found.map(|f| f.id), Some(m.id));

            let rows = matches_sea::transition_status(
                txn,
                m.id,
                MatchStatus::Active,
                MatchStatus::Cancelled,
            )
            .await?;
            assert_eq!(rows, 1);
            let cancelled = matches_sea::require_match(txn, m.id).await?;
            assert_eq!(cancelled.status, MatchStatus::Cancelled);
            assert!(cancelled.join_code.is_none(), "terminal status releases the code");
            assert!(matches_sea::find_live_by_join_code(txn, "161803").await?.is_none());

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_and_touch_respect_status() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host_id = host(txn).await?;
            let keep = matches_sea::insert_match(txn, new_match(host_id, "111111"))
                .await?
                .expect("inserted");
            let drop_me = matches_sea::insert_match(txn, new_match(host_id, "222222"))
                .await?
                .expect("inserted");

            matches_sea::transition_status(txn, keep.id, MatchStatus::Created, MatchStatus::Active)
                .await?;
            assert_eq!(matches_sea::delete_if_created(txn, keep.id).await?, 0);
            assert_eq!(matches_sea::delete_if_created(txn, drop_me.id).await?, 1);
            assert!(matches_sea::find_by_id(txn, drop_me.id).await?.is_none());

            assert_eq!(
                matches_sea::touch_if_status(txn, keep.id, MatchStatus::Created).await?,
                0
            );
            assert_eq!(
                matches_sea::touch_if_status(txn, keep.id, MatchStatus::Active).await?,
                1
            );

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn missing_match_is_a_structured_error() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            matches_sea::require_match(txn, 424_242).await?;
            Ok::<_, AppError>(())
        })
    })
    .await
    .expect_err("missing row");

    assert_eq!(err.status(), actix_web::http::StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_pages() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host_id = host(txn).await?;
            let mut ids = Vec::new();
            for code in ["400001", "400002", "400003"] {
                let m = matches_sea::insert_match(txn, new_match(host_id, code))
                    .await?
                    .expect("inserted");
                ids.push(m.id);
            }
            matches_sea::transition_status(txn, ids[0], MatchStatus::Created, MatchStatus::Active)
                .await?;

            let (rows, total) = matches_sea::list_matches(
                txn,
                MatchListFilter {
                    page: 1,
                    limit: 10,
                    status: Some(MatchStatus::Created),
                    match_date: None,
                },
            )
            .await?;
            assert_eq!(total, 2);
            assert_eq!(
                rows.iter().map(|r| r.id).collect::<Vec<_>>(),
                vec![ids[2], ids[1]],
                "newest first"
            );

            let (page2, total) = matches_sea::list_matches(
                txn,
                MatchListFilter {
                    page: 2,
                    limit: 2,
                    status: None,
                    match_date: Some("2026-06-14".to_string()),
                },
            )
            .await?;
            assert_eq!(total, 3);
            assert_eq!(page2.len(), 1);
            assert_eq!(page2[0].id, ids[0]);

            Ok::<_, AppError>(())
        })
    })
    .await
}
