use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::trace_ctx::TraceId;

/// Emits one `request_completed` event per request, leveled by status class.
///
/// Routed requests also carry the matched `route` pattern and, for the
/// `/api/matches/{match_id}` family, the `match_id`.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Fields known only after routing.
#[derive(Default)]
struct Routed {
    route: Option<String>,
    match_id: Option<String>,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, routed) = match &result {
                Ok(res) => {
                    let http_req = res.request();
                    let routed = Routed {
                        route: http_req.match_pattern(),
                        match_id: http_req.match_info().get("match_id").map(str::to_string),
                    };
                    (res.status(), routed)
                }
                Err(err) => (err.as_response_error().status_code(), Routed::default()),
            };

            emit(
                status,
                &method,
                &path,
                &routed,
                start.elapsed().as_micros() as u64,
                &trace_id,
            );

            result
        })
    }
}

fn emit(status: StatusCode, method: &str, path: &str, routed: &Routed, duration_us: u64, trace_id: &str) {
    let status_code = status.as_u16();
    let route = routed.route.as_deref().unwrap_or("-");
    let match_id = routed.match_id.as_deref().unwrap_or("-");

    if status.is_server_error() {
        error!(http.method = %method, url.path = %path, http.route = %route, match_id = %match_id, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
    } else if status.is_client_error() {
        warn!(http.method = %method, url.path = %path, http.route = %route, match_id = %match_id, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
    } else {
        info!(http.method = %method, url.path = %path, http.route = %route, match_id = %match_id, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
    }
}
