use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::JwtExtract;

pub mod courses;
pub mod health;
pub mod matches;

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid path: {err}")).into()
}

/// Register every route. `main` and the route tests share this so both see
/// the same paths and the same bearer-token guard on `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    cfg.configure(health::configure_routes);

    cfg.service(
        web::scope("/api")
            .wrap(JwtExtract)
            .service(web::scope("/matches").configure(matches::configure_routes))
            .configure(courses::configure_routes),
    );
}
