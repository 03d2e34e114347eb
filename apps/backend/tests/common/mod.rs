#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use backend_test_support::problem_details::{
    assert_problem_details_from_service_response, ProblemDetailsLike,
};
use skins_backend::errors::ErrorCode;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Policy defaults to rollback but can be flipped per-binary via `SKINS_TXN_POLICY=commit`.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("SKINS_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "commit" => skins_backend::db::txn_policy::TxnPolicy::CommitOnOk,
        _ => skins_backend::db::txn_policy::TxnPolicy::RollbackOnOk,
    };

    skins_backend::db::txn_policy::set_txn_policy(policy);
}

/// Assert a problem+json response by its typed code.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    code: ErrorCode,
    status: StatusCode,
) -> ProblemDetailsLike {
    assert_problem_details_from_service_response(resp, code.as_str(), status).await
}
