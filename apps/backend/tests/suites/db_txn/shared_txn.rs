use actix_web::test::TestRequest;
use actix_web::HttpMessage;
use backend_test_support::unique_helpers::unique_sub;
use skins_backend::adapters::users_sea::{self, UserCreate};
use skins_backend::db::require_db;
use skins_backend::db::txn::{with_txn, SharedTxn};
use skins_backend::AppError;

use crate::support::build_test_state;

#[actix_web::test]
async fn with_txn_reuses_the_request_transaction() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let req = TestRequest::default().to_http_request();
    req.extensions_mut().insert(shared.clone());

    let sub = unique_sub("shared");
    with_txn(Some(&req), &state, |txn| {
        let sub = sub.clone();
        Box::pin(async move {
            users_sea::create_user(txn, UserCreate::new(sub, "Shared")).await?;
            Ok::<_, AppError>(())
        })
    })
    .await?;

    // Visible through the same transaction afterwards.
    let seen = users_sea::find_by_sub(shared.transaction(), &sub).await?;
    assert!(seen.is_some());

    drop(req);
    shared.rollback().await?;

    let db = require_db(&state)?;
    assert!(users_sea::find_by_sub(db, &sub).await?.is_none());
    Ok(())
}

#[actix_web::test]
async fn rollback_refuses_while_still_shared() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;
    let other = shared.clone();

    assert!(shared.rollback().await.is_err());
    other.rollback().await?;
    Ok(())
}
