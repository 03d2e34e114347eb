use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};
use skins_backend::db::require_db;
use skins_backend::db::txn::SharedTxn;
use skins_backend::errors::ErrorCode;
use skins_backend::AppError;

use super::authed;
use crate::common::assert_problem;
use crate::support::factory::create_test_user;
use crate::support::{build_test_state, create_test_app};

fn create_body(max_players: i64, entry_fee_cents: i64) -> Value {
    json!({
        "course_name": "Riverside Links",
        "date": "2026-06-14",
        "tee_time": "08:30",
        "max_players": max_players,
        "entry_fee_cents": entry_fee_cents
    })
}

#[actix_web::test]
async fn full_round_over_http() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let host = create_test_user(shared.transaction(), "Hana").await?;
    let guest = create_test_user(shared.transaction(), "Gil").await?;

    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    // create
    let req = authed(test::TestRequest::post().uri("/api/matches"), &host.sub, &sec)
        .set_json(create_body(4, 1000));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().expect("id");
    let code = created["join_code"].as_str().expect("join code").to_string();
    assert_eq!(created["status"], "created");
    assert_eq!(created["host_name"], "Hana");
    assert_eq!(created["current_players"], 1);

    // join by code
    let req = authed(
        test::TestRequest::post().uri("/api/matches/join-by-code"),
        &guest.sub,
        &sec,
    )
    .set_json(json!({ "join_code": code }));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let joined: Value = test::read_body_json(resp).await;
    assert_eq!(joined["current_players"], 2);

    // start
    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/start")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let started: Value = test::read_body_json(resp).await;
    assert_eq!(started["status"], "active");

    // scores
    for (sub, strokes) in [(&host.sub, 3), (&guest.sub, 5)] {
        let req = authed(
            test::TestRequest::post().uri(&format!("/api/matches/{match_id}/score")),
            sub,
            &sec,
        )
        .set_json(json!({ "hole_number": 1, "score": strokes, "par": 4 }));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let _: Value = test::read_body_json(resp).await;
    }

    let req = authed(
        test::TestRequest::get().uri(&format!("/api/matches/{match_id}/scores")),
        &guest.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let scores: Value = test::read_body_json(resp).await;
    assert_eq!(scores["match_status"], "active");
    assert_eq!(scores["total_skins"], 1);
    assert_eq!(scores["holes"][0]["completed"], true);
    assert_eq!(scores["holes"][0]["skin_value_cents"], 1000);

    let req = authed(
        test::TestRequest::get().uri(&format!("/api/matches/{match_id}/scorecard")),
        &guest.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let card: Value = test::read_body_json(resp).await;
    assert_eq!(card["rows"].as_array().map(Vec::len), Some(18));
    assert_eq!(card["totals"][0]["skins_won"], 1);

    // complete
    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/complete")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let done: Value = test::read_body_json(resp).await;
    assert_eq!(done["status"], "completed");
    assert_eq!(done["join_code"], Value::Null);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn duplicate_score_is_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let host = create_test_user(shared.transaction(), "host").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(test::TestRequest::post().uri("/api/matches"), &host.sub, &sec)
        .set_json(create_body(4, 0));
    let resp = test::call_service(&app, req.to_request()).await;
    let created: Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().expect("id");

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/start")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let _: Value = test::read_body_json(resp).await;

    let score = json!({ "hole_number": 4, "score": 4 });
    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/score")),
        &host.sub,
        &sec,
    )
    .set_json(score.clone());
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let _: Value = test::read_body_json(resp).await;

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/score")),
        &host.sub,
        &sec,
    )
    .set_json(score);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::ScoreAlreadyRecorded, StatusCode::CONFLICT).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn non_host_gets_forbidden_and_full_match_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let host = create_test_user(shared.transaction(), "host").await?;
    let guest = create_test_user(shared.transaction(), "guest").await?;
    let late = create_test_user(shared.transaction(), "late").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(test::TestRequest::post().uri("/api/matches"), &host.sub, &sec)
        .set_json(create_body(2, 0));
    let resp = test::call_service(&app, req.to_request()).await;
    let created: Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().expect("id");

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/join")),
        &guest.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let _: Value = test::read_body_json(resp).await;

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/join")),
        &late.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::MatchFull, StatusCode::CONFLICT).await;

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/cancel")),
        &guest.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::NotHost, StatusCode::FORBIDDEN).await;

    let req = authed(
        test::TestRequest::post().uri(&format!("/api/matches/{match_id}/leave")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::HostCannotLeave, StatusCode::FORBIDDEN).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn update_list_and_delete() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let host = create_test_user(shared.transaction(), "host").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(test::TestRequest::post().uri("/api/matches"), &host.sub, &sec)
        .set_json(create_body(4, 0));
    let resp = test::call_service(&app, req.to_request()).await;
    let created: Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().expect("id");

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/matches/{match_id}")),
        &host.sub,
        &sec,
    )
    .set_json(json!({ "course_name": "Cliffside", "location": null }));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["course_name"], "Cliffside");

    let req = authed(
        test::TestRequest::get().uri("/api/matches?status=created&limit=5"),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["limit"], 5);
    assert_eq!(page["matches"][0]["id"], match_id);

    let req = authed(
        test::TestRequest::delete().uri(&format!("/api/matches/{match_id}")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = authed(
        test::TestRequest::get().uri(&format!("/api/matches/{match_id}")),
        &host.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::MatchNotFound, StatusCode::NOT_FOUND).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn create_with_course_uses_the_catalog() -> Result<(), AppError> {
    use crate::support::courses::{COURSE_ID, TEE_ID};

    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let host = create_test_user(shared.transaction(), "host").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(
        test::TestRequest::post().uri("/api/matches/with-course"),
        &host.sub,
        &sec,
    )
    .set_json(json!({
        "course_id": COURSE_ID,
        "tee_id": TEE_ID,
        "date": "2026-07-04",
        "tee_time": "07:45",
        "entry_fee_cents": 200
    }));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["course_name"], "Pebble Creek - Blue");
    assert_eq!(created["max_players"], 4);

    drop(app);
    shared.rollback().await?;
    Ok(())
}
