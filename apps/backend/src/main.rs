use actix_web::{web, App, HttpServer};
use skins_backend::infra::state::build_state;
use skins_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use skins_backend::routes;
use skins_backend::services::courses::GolfApiCatalog;
use skins_backend::telemetry;
use std::sync::Arc;
use tracing::{error, info};

mod bin_support;

use bin_support::config_app::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment;
    // no .env file is read here.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let courses = match GolfApiCatalog::from_config(&config.app.course_api) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!(error = %e, "failed to build course catalog client");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_env(config.runtime_env)
        .with_db(config.db_kind)
        .with_security(config.security())
        .with_config(config.app.clone())
        .with_courses(courses)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, "starting skins backend");

    let cors_origins = app_state.config.cors_origins.clone();
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
