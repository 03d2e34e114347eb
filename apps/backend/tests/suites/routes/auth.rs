use actix_web::body::to_bytes;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend_test_support::unique_helpers::unique_sub;
use serde_json::Value;
use skins_backend::db::require_db;
use skins_backend::db::txn::SharedTxn;
use skins_backend::errors::ErrorCode;
use skins_backend::repos::users;
use skins_backend::state::security_config::SecurityConfig;
use skins_backend::AppError;

use super::authed;
use crate::common::assert_problem;
use crate::support::auth::mint_expired_token;
use crate::support::test_state::test_state_builder;
use crate::support::{build_test_state, create_test_app};

/// Status and problem body of a request the bearer guard turned away.
///
/// Middleware errors surface as `Err` from the service rather than as a
/// response, so both shapes are accepted.
async fn rejected<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
{
    let resp = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            return (status, test::read_body_json(resp).await);
        }
        Err(err) => err.error_response(),
    };
    let status = resp.status();
    let bytes = to_bytes(resp.into_body()).await.expect("problem body");
    let body = serde_json::from_slice(&bytes).expect("problem json");
    (status, body)
}

#[actix_web::test]
async fn missing_bearer_is_unauthorized() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let (status, body) = rejected(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::UnauthorizedMissingBearer.as_str());
    Ok(())
}

#[actix_web::test]
async fn malformed_and_expired_tokens_are_told_apart() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/matches")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let (status, body) = rejected(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::UnauthorizedInvalidJwt.as_str());

    let expired = mint_expired_token(&unique_sub("expired"), &sec);
    let req = test::TestRequest::get()
        .uri("/api/matches")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .to_request();
    let (status, body) = rejected(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::UnauthorizedExpiredJwt.as_str());

    let req = test::TestRequest::get()
        .uri("/api/matches")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let (status, _) = rejected(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[actix_web::test]
async fn unknown_subject_is_forbidden_without_provisioning() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sec = state.security.clone();
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let req = authed(
        test::TestRequest::get().uri("/api/matches"),
        &unique_sub("stranger"),
        &sec,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_problem(resp, ErrorCode::ForbiddenUserNotFound, StatusCode::FORBIDDEN).await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn auto_provisioning_creates_the_caller() -> Result<(), AppError> {
    let sec = SecurityConfig::default().with_auto_provision(true);
    let state = test_state_builder()?
        .with_security(sec.clone())
        .build()
        .await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let app = create_test_app(state).with_prod_routes()
        .with_shared_txn(&shared)
        .build()
        .await?;

    let sub = unique_sub("newcomer");
    let req = authed(test::TestRequest::get().uri("/api/matches"), &sub, &sec);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 0);

    let user = users::find_user_by_sub(shared.transaction(), &sub)
        .await?
        .expect("caller provisioned");
    assert_eq!(user.sub, sub);

    // second call reuses the row
    let req = authed(test::TestRequest::get().uri("/api/matches"), &sub, &sec);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let again = users::find_user_by_sub(shared.transaction(), &sub)
        .await?
        .expect("still there");
    assert_eq!(again.id, user.id);

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn health_needs_no_token() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
