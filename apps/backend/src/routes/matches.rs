//! Match HTTP routes: lifecycle, roster and scoring under `/api/matches`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, MatchId, ValidatedJson};
use crate::services::matches::{
    self, CreateMatchInput, CreateWithCourseInput, ListMatchesQuery, UpdateMatchInput,
};
use crate::services::projector;
use crate::services::roster;
use crate::services::scoring::{self, ScoreSubmission};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinByCodeRequest {
    pub join_code: String,
}

/// POST /api/matches
async fn create_match(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<CreateMatchInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let host_id = user.id;
    let cfg = app_state.config.matches.clone();

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::create_match(txn, host_id, input, &cfg).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(view))
}

/// POST /api/matches/with-course
///
/// Course name, location and per-hole par/distance come from the catalog.
async fn create_match_with_course(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<CreateWithCourseInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let host_id = user.id;
    let cfg = app_state.config.matches.clone();
    let catalog = app_state.courses.clone();

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move {
            Ok(
                matches::create_match_with_course(txn, catalog.as_ref(), host_id, input, &cfg)
                    .await?,
            )
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(view))
}

/// GET /api/matches
async fn list_matches(
    http_req: HttpRequest,
    _user: CurrentUser,
    query: web::Query<ListMatchesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let page = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::list_matches(txn, query).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/matches/{match_id}
async fn get_match(
    http_req: HttpRequest,
    _user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::get_match(txn, id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// PUT /api/matches/{match_id}
async fn update_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    body: ValidatedJson<UpdateMatchInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;
    let input = body.into_inner();

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::update_match(txn, id, user_id, input).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /api/matches/{match_id}
async fn delete_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;

    with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::delete_match(txn, id, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/matches/{match_id}/join
async fn join_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(roster::join(txn, id, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/join-by-code
async fn join_by_code(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<JoinByCodeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = body.into_inner().join_code;
    let user_id = user.id;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(roster::join_by_code(txn, &code, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/{match_id}/leave
async fn leave_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;
    let cfg = app_state.config.scoring;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(roster::leave(txn, id, user_id, cfg).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/{match_id}/start
async fn start_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::start_match(txn, id, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/{match_id}/complete
async fn complete_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::complete_match(txn, id, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/{match_id}/cancel
async fn cancel_match(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(matches::cancel_match(txn, id, user_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/matches/{match_id}/score
///
/// Responds with the full scores view so clients can redraw the board.
async fn record_score(
    http_req: HttpRequest,
    user: CurrentUser,
    match_id: MatchId,
    body: ValidatedJson<ScoreSubmission>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;
    let user_id = user.id;
    let submission = body.into_inner();
    let cfg = app_state.config.scoring;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(scoring::record_score(txn, id, user_id, submission, cfg).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/matches/{match_id}/scores
async fn get_scores(
    http_req: HttpRequest,
    _user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(projector::scores_view(txn, id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/matches/{match_id}/scorecard
async fn get_scorecard(
    http_req: HttpRequest,
    _user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = match_id.0;

    let view = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { Ok(projector::scorecard_view(txn, id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_matches))
            .route(web::post().to(create_match)),
    )
    .service(web::resource("/with-course").route(web::post().to(create_match_with_course)))
    .service(web::resource("/join-by-code").route(web::post().to(join_by_code)))
    .service(
        web::resource("/{match_id}")
            .route(web::get().to(get_match))
            .route(web::put().to(update_match))
            .route(web::delete().to(delete_match)),
    )
    .service(web::resource("/{match_id}/join").route(web::post().to(join_match)))
    .service(web::resource("/{match_id}/leave").route(web::post().to(leave_match)))
    .service(web::resource("/{match_id}/start").route(web::post().to(start_match)))
    .service(web::resource("/{match_id}/complete").route(web::post().to(complete_match)))
    .service(web::resource("/{match_id}/cancel").route(web::post().to(cancel_match)))
    .service(web::resource("/{match_id}/score").route(web::post().to(record_score)))
    .service(web::resource("/{match_id}/scores").route(web::get().to(get_scores)))
    .service(web::resource("/{match_id}/scorecard").route(web::get().to(get_scorecard)));
}
