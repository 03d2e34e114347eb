//! Read-through lookups against the course catalog.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::courses::{require_tee, Tee};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct TeesResponse {
    course_id: String,
    tees: Vec<Tee>,
}

/// GET /api/courses/{course_id}
async fn get_course(
    _user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let course = app_state.courses.get_course(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(course))
}

/// GET /api/courses/{course_id}/tees
async fn list_tees(
    _user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let course = app_state.courses.get_course(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TeesResponse {
        course_id: course.course_id,
        tees: course.tees,
    }))
}

/// GET /api/courses/{course_id}/tees/{tee_id}
async fn get_tee(
    _user: CurrentUser,
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (course_id, tee_id) = path.into_inner();
    let course = app_state.courses.get_course(&course_id).await?;
    let tee = require_tee(&course, &tee_id)?;
    Ok(HttpResponse::Ok().json(tee))
}

/// GET /api/clubs/{club_id}
async fn get_club(
    _user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let club = app_state.courses.get_club(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(club))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/courses/{course_id}").route(web::get().to(get_course)))
        .service(web::resource("/courses/{course_id}/tees").route(web::get().to(list_tees)))
        .service(
            web::resource("/courses/{course_id}/tees/{tee_id}").route(web::get().to(get_tee)),
        )
        .service(web::resource("/clubs/{club_id}").route(web::get().to(get_club)));
}
