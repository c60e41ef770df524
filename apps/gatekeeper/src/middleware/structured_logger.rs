//! One `request_completed` event per request.
//!
//! Besides the usual method, status and duration, the event records where the
//! request actually went: `url.path` is what the client asked for, `route` is
//! the path the authorization gate dispatched it to. A denied request shows up
//! as `url.path=/user/delete route=/error`.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::auth::claims::Claims;

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

/// Fields gathered before and after the inner service runs.
struct Completed {
    method: String,
    requested: String,
    route: String,
    authenticated: bool,
    status: StatusCode,
    duration_us: u64,
    trace_id: String,
}

impl Completed {
    fn emit(&self) {
        let Completed {
            method,
            requested,
            route,
            authenticated,
            status,
            duration_us,
            trace_id,
        } = self;
        let status_code = status.as_u16();
        if status.is_server_error() {
            error!(http.method = %method, url.path = %requested, route = %route, authenticated, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
        } else if status.is_client_error() {
            warn!(http.method = %method, url.path = %requested, route = %route, authenticated, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
        } else {
            info!(http.method = %method, url.path = %requested, route = %route, authenticated, http.status_code = status_code, duration_us, trace_id = %trace_id, "request_completed");
        }
    }
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
        let requested = req.match_info().as_str().to_string();
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // the gate rewrites the request in place, so the response's request
            // reflects the dispatched path
            let (status, route, authenticated) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request().match_info().as_str().to_string(),
                    res.request().extensions().contains::<Claims>(),
                ),
                Err(err) => (err.as_response_error().status_code(), requested.clone(), false),
            };

            Completed {
                method,
                requested,
                route,
                authenticated,
                status,
                duration_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
                trace_id,
            }
            .emit();

            result
        })
    }
}
