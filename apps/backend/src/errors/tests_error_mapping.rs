// Unit tests for DomainError -> AppError mapping; no HTTP server or database involved.
use actix_web::ResponseError;

use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation(ValidationKind::HoleNumber, "hole 19").into();
    assert_eq!(app.code(), ErrorCode::InvalidHoleNumber);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_not_found_and_forbidden() {
    let app: AppError = DomainError::match_not_found(7).into();
    assert_eq!(app.code(), ErrorCode::MatchNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::forbidden(ForbiddenKind::NotHost, "host only").into();
    assert_eq!(app.code(), ErrorCode::NotHost);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn state_full_and_conflicts_are_409() {
    let cases = [
        (DomainError::invalid_state("x"), ErrorCode::InvalidState),
        (DomainError::full("x"), ErrorCode::MatchFull),
        (
            DomainError::conflict(ConflictKind::ScoreAlreadyRecorded, "x"),
            ErrorCode::ScoreAlreadyRecorded,
        ),
        (
            DomainError::conflict(ConflictKind::Other("Unique".into()), "x"),
            ErrorCode::Conflict,
        ),
    ];
    for (domain, code) in cases {
        let app: AppError = domain.into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 409);
    }
}

#[test]
fn maps_upstream_and_infra() {
    let app: AppError = DomainError::upstream("course api down").into();
    assert_eq!(app.code(), ErrorCode::UpstreamUnavailable);
    assert_eq!(app.status().as_u16(), 502);

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.status().as_u16(), 503);
    let resp = app.error_response();
    assert!(resp.headers().get("Retry-After").is_some());

    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "slow").into();
    assert!(matches!(app, AppError::Timeout { .. }));
    assert_eq!(app.status().as_u16(), 504);
}

#[test]
fn other_not_found_falls_back_to_generic_code() {
    let app: AppError = DomainError::not_found(NotFoundKind::Other("Record".into()), "x").into();
    assert_eq!(app.code(), ErrorCode::NotFound);
}

#[test]
fn unauthorized_sets_www_authenticate() {
    let resp = AppError::unauthorized_invalid_jwt().error_response();
    assert_eq!(resp.status().as_u16(), 401);
    assert_eq!(
        resp.headers()
            .get("WWW-Authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}
