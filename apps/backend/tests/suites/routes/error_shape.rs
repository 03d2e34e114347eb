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

#[actix_web::test]
async fn bad_match_ids_are_rejected_before_lookup() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let user = create_test_user(shared.transaction(), "ida").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    for raw in ["abc", "0", "-3"] {
        let req = authed(
            test::TestRequest::get().uri(&format!("/api/matches/{raw}")),
            &user.sub,
            &sec,
        );
        let resp = test::call_service(&app, req.to_request()).await;
        assert_problem(resp, ErrorCode::InvalidMatchId, StatusCode::BAD_REQUEST).await;
    }

    let req = authed(
        test::TestRequest::get().uri("/api/matches/987654321/scorecard"),
        &user.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::MatchNotFound, StatusCode::NOT_FOUND).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn malformed_bodies_and_queries_are_bad_requests() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let user = create_test_user(shared.transaction(), "ida").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(test::TestRequest::post().uri("/api/matches"), &user.sub, &sec)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"course_name": "Oops""#);
    let resp = test::call_service(&app, req.to_request()).await;
    let problem = assert_problem(resp, ErrorCode::BadRequest, StatusCode::BAD_REQUEST).await;
    assert!(!problem.detail.is_empty());

    let req = authed(test::TestRequest::post().uri("/api/matches"), &user.sub, &sec)
        .set_json(json!({ "course_name": "Riverside", "date": 20260614, "tee_time": "08:30" }));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::BadRequest, StatusCode::BAD_REQUEST).await;

    let req = authed(
        test::TestRequest::get().uri("/api/matches?limit=lots"),
        &user.sub,
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::BadRequest, StatusCode::BAD_REQUEST).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn problems_carry_type_trace_and_content_type() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let user = create_test_user(shared.transaction(), "ida").await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(
        test::TestRequest::post().uri("/api/matches/join-by-code"),
        &user.sub,
        &sec,
    )
    .set_json(json!({ "join_code": "000000" }));
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    let header_trace = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::MatchNotFound.as_str());
    assert_eq!(
        body["type"],
        format!("https://skins.golf/errors/{}", ErrorCode::MatchNotFound.as_str())
    );
    assert_eq!(body["status"], 404);
    assert_eq!(body["trace_id"], header_trace);

    drop(app);
    shared.rollback().await?;
    Ok(())
}
